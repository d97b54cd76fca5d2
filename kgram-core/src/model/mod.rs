//! Top-level module for the k-gram model.
//!
//! This module provides a fixed-order character Markov model, including:
//! - The trainable and sampleable model (`LanguageModel`)
//! - Internal per-context state management (`State`)
//! - Exact weighted sampling over integer counts (`CumulativeWeights`)
//! - The generation start strategy (`StartSeed`)

/// Fixed-order (k-gram) character model.
///
/// Handles training, weighted generation, introspection of the learned
/// counts and `postcard` snapshots.
pub mod language_model;

/// Exact weighted random choice over integer weights.
pub mod sampler;

/// Internal representation of a single context state.
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;

/// Strategy used to pick the first context of a generated text.
pub mod start_seed;
