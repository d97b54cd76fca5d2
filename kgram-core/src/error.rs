use thiserror::Error;

/// Errors reported by the k-gram model.
///
/// Short training input and generation that stops early are not errors:
/// they produce no contexts or a shorter output respectively.
#[derive(Debug, Error)]
pub enum ModelError {
	/// The context length must be at least 1.
	#[error("invalid configuration: k must be >= 1, got {k}")]
	InvalidConfiguration { k: usize },

	/// A custom start seed does not have exactly `k` characters.
	#[error("invalid seed: expected {expected} characters, got {found}")]
	InvalidSeed { expected: usize, found: usize },

	/// A decoded snapshot breaks one of the model invariants.
	#[error("corrupt snapshot: {0}")]
	CorruptSnapshot(String),

	/// A snapshot could not be encoded or decoded by `postcard`.
	#[error("snapshot encoding failed: {0}")]
	Codec(#[from] postcard::Error),

	/// Reading or writing a snapshot file failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
