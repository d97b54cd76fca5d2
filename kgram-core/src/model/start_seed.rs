/// Strategy used to select the starting context when generating text.
///
/// # Variants
/// - `Weighted`: draw a context from the registry, each context weighted by
///   how often it was observed during training.
/// - `Custom(String)`: start from the given context, which must contain
///   exactly `k` characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartSeed {
	#[default]
	Weighted,
	Custom(String),
}

impl StartSeed {
	/// Builds a custom seed from anything convertible to a `String`.
	pub fn custom(context: impl Into<String>) -> Self {
		StartSeed::Custom(context.into())
	}
}
