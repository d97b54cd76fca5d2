//! Character-level k-gram text generation library.
//!
//! This crate provides a fixed-order Markov model over characters:
//! - Training from raw text, additive over any number of calls
//! - Generation by exact weighted sampling, with injectable randomness
//! - Read-only statistics and optional `postcard` snapshots
//!
//! ```
//! use kgram_core::LanguageModel;
//!
//! let mut model = LanguageModel::new(2)?;
//! model.train("abcabcabc");
//! assert_eq!(model.context_frequency("ab"), 3);
//! assert_eq!(model.generate(12).chars().count(), 12);
//! # Ok::<(), kgram_core::ModelError>(())
//! ```

/// Core k-gram model and generation logic.
pub mod model;

/// Error type shared by the model operations.
pub mod error;

pub use error::ModelError;
pub use model::language_model::LanguageModel;
pub use model::start_seed::StartSeed;
