use std::path::Path;

use indexmap::IndexMap;
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sampler::CumulativeWeights;
use super::start_seed::StartSeed;
use super::state::State;
use crate::error::ModelError;

/// Upper bound on the output buffer reserved up front by generation.
const MAX_PREALLOCATION: usize = 1 << 20;

/// Fixed-order character Markov model.
///
/// The `LanguageModel` learns, for every context of `k` consecutive
/// characters seen in training, how often each character followed it, and
/// samples new text from those counts.
///
/// # Responsibilities
/// - Build the context registry and transition tables from raw text
/// - Generate text by exact weighted sampling over the learned counts
/// - Expose read-only statistics about what was learned
///
/// # Invariants
/// - `k` is always >= 1 and never changes
/// - Each key of `states` has exactly `k` characters
/// - The insertion order of `states` is the order in which contexts were
///   first observed (the context registry)
/// - Every state has at least one transition and its frequency is the sum of
///   its transition counts
/// - Training only ever adds: counts never decrease and contexts are never
///   removed
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LanguageModel {
	/// Context length.
	k: usize, // must be >= 1

	/// Mapping from a context to its state, in first-observation order.
	states: IndexMap<Box<[char]>, State>,
}

impl LanguageModel {
	/// Creates an empty model with context length `k`.
	///
	/// # Errors
	/// Returns `ModelError::InvalidConfiguration` if `k == 0`.
	pub fn new(k: usize) -> Result<Self, ModelError> {
		if k == 0 {
			return Err(ModelError::InvalidConfiguration { k });
		}
		Ok(Self { k, states: IndexMap::new() })
	}

	/// Context length.
	pub fn k(&self) -> usize {
		self.k
	}

	/// Returns `true` once at least one context has been observed.
	pub fn is_trained(&self) -> bool {
		!self.states.is_empty()
	}

	/// Number of distinct contexts in the registry.
	pub fn context_count(&self) -> usize {
		self.states.len()
	}

	/// Total number of training positions observed, over all `train` calls.
	///
	/// Saturates at `u64::MAX`.
	pub fn total_observations(&self) -> u64 {
		self.states
			.values()
			.fold(0u64, |total, state| total.saturating_add(state.frequency()))
	}

	/// Adds the k-grams of `text` to the model.
	///
	/// Every position `i` in `0..=n-k-1` records the transition from
	/// `text[i..i+k]` to `text[i+k]`. Contexts observed for the first time
	/// are appended to the registry.
	///
	/// # Notes
	/// - Text with `k` characters or fewer produces no k-gram: no-op.
	/// - Counts accumulate across calls. Transitions straddling two
	///   separate calls are not recorded.
	/// - Linear in the length of `text`: only a context seen for the first
	///   time allocates its key.
	pub fn train(&mut self, text: &str) {
		let chars: Vec<char> = text.chars().collect();
		if chars.len() <= self.k {
			// Text too short, no k-grams to compute
			debug!("skipped training on {} characters (k = {})", chars.len(), self.k);
			return;
		}

		let known = self.states.len();
		for window in chars.windows(self.k + 1) {
			let (context, next) = window.split_at(self.k);
			let next_char = next[0];

			if let Some(state) = self.states.get_mut(context) {
				state.add_transition(next_char);
			} else {
				let mut state = State::new();
				state.add_transition(next_char);
				self.states.insert(context.into(), state);
			}
		}

		debug!(
			"trained on {} positions, {} new contexts ({} total)",
			chars.len() - self.k,
			self.states.len() - known,
			self.states.len()
		);
	}

	/// Number of times `context` was observed (0 if never).
	pub fn context_frequency(&self, context: &str) -> u64 {
		self.state(context).map_or(0, State::frequency)
	}

	/// Number of times `next_char` followed `context` (0 if never).
	pub fn transition_count(&self, context: &str, next_char: char) -> u64 {
		self.state(context).map_or(0, |state| state.count(next_char))
	}

	/// Successors of `context` with their counts, in first-observation order.
	///
	/// Empty if `context` was never observed.
	pub fn transitions(&self, context: &str) -> Vec<(char, u64)> {
		self.state(context).map(|state| state.iter().collect()).unwrap_or_default()
	}

	/// The context registry: every distinct context with its frequency, in
	/// first-observation order.
	pub fn contexts(&self) -> impl Iterator<Item = (String, u64)> + '_ {
		self.states
			.iter()
			.map(|(context, state)| (context.iter().collect(), state.frequency()))
	}

	fn state(&self, context: &str) -> Option<&State> {
		let key: Vec<char> = context.chars().collect();
		self.states.get(key.as_slice())
	}

	/// Draws a registry index, each context weighted by its frequency.
	fn sample_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
		CumulativeWeights::new(self.states.values().map(State::frequency)).sample(rng)
	}

	/// Returns a random context from the registry.
	///
	/// Contexts are drawn proportionally to how often they were observed.
	/// Returns `None` if the model is untrained.
	pub fn random_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
		let index = self.sample_context(rng)?;
		self.states.get_index(index).map(|(context, _)| context.iter().collect())
	}

	/// Predicts the character following `context`.
	///
	/// Returns `None` if `context` is unknown.
	pub fn predict<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> Option<char> {
		self.state(context)?.predict(rng)
	}

	/// Generates up to `length` characters using the thread-local generator.
	///
	/// See [`LanguageModel::generate_with`].
	pub fn generate(&self, length: usize) -> String {
		self.generate_with(length, &mut rand::rng())
	}

	/// Generates up to `length` characters using `rng`.
	///
	/// # Behavior
	/// - Draws the starting context from the registry, weighted by frequency,
	///   and emits it (truncated if `length < k`).
	/// - Then repeatedly samples a successor of the last `k` emitted
	///   characters, weighted by transition count.
	/// - Stops early if the current context was never observed.
	///
	/// # Returns
	/// The empty string if `length == 0` or the model is untrained.
	///
	/// # Notes
	/// - Each call builds the running sums of all context frequencies to draw
	///   the start context: O(number of contexts) time and memory before the
	///   first character. Many short generations from a model with many
	///   contexts are dominated by this cost; prefer fewer, longer calls or
	///   [`LanguageModel::generate_from`] with a known context.
	/// - Each further character costs one lookup of `k` characters plus a
	///   scan over that context's successors.
	pub fn generate_with<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> String {
		if length == 0 {
			return String::new();
		}
		match self.sample_context(rng).and_then(|index| self.states.get_index(index)) {
			Some((start, _)) => self.extend(start, length, rng),
			None => String::new(),
		}
	}

	/// Generates up to `length` characters starting from `seed`.
	///
	/// The seed is emitted as the first characters of the output, then
	/// generation continues as in [`LanguageModel::generate_with`].
	///
	/// # Errors
	/// Returns `ModelError::InvalidSeed` if `seed` does not have exactly `k`
	/// characters.
	pub fn generate_from<R: Rng + ?Sized>(
		&self,
		seed: &str,
		length: usize,
		rng: &mut R,
	) -> Result<String, ModelError> {
		let start: Vec<char> = seed.chars().collect();
		if start.len() != self.k {
			return Err(ModelError::InvalidSeed { expected: self.k, found: start.len() });
		}
		Ok(self.extend(&start, length, rng))
	}

	/// Generates up to `length` characters, starting as `start_seed` says.
	pub fn generate_seeded<R: Rng + ?Sized>(
		&self,
		length: usize,
		start_seed: &StartSeed,
		rng: &mut R,
	) -> Result<String, ModelError> {
		match start_seed {
			StartSeed::Weighted => Ok(self.generate_with(length, rng)),
			StartSeed::Custom(seed) => self.generate_from(seed, length, rng),
		}
	}

	/// Emits `start` then samples successors until `length` characters.
	///
	/// The current context is the tail of the output buffer, so sliding it
	/// by one character costs nothing.
	fn extend<R: Rng + ?Sized>(&self, start: &[char], length: usize, rng: &mut R) -> String {
		let mut output: Vec<char> = Vec::with_capacity(length.min(MAX_PREALLOCATION));
		output.extend_from_slice(&start[..length.min(start.len())]);

		while output.len() < length {
			let context = &output[output.len() - self.k..];
			let Some(next_char) = self.states.get(context).and_then(|state| state.predict(rng)) else {
				trace!("no transition recorded, stopped after {} of {} characters", output.len(), length);
				break;
			};
			output.push(next_char);
		}

		output.into_iter().collect()
	}

	/// Encodes the model with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a model encoded by [`LanguageModel::to_bytes`].
	///
	/// # Errors
	/// - `ModelError::Codec` if the bytes cannot be decoded.
	/// - `ModelError::CorruptSnapshot` if the decoded model breaks an
	///   invariant (wrong context length, frequency not matching the
	///   transition counts, empty or zero-count transitions).
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
		let model: Self = postcard::from_bytes(bytes)?;
		model.validate()?;
		Ok(model)
	}

	/// Writes the encoded model to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		let bytes = self.to_bytes()?;
		std::fs::write(&path, &bytes)?;
		debug!("saved {} contexts ({} bytes) to {}", self.states.len(), bytes.len(), path.as_ref().display());
		Ok(())
	}

	/// Reads a model written by [`LanguageModel::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let bytes = std::fs::read(&path)?;
		let model = Self::from_bytes(&bytes)?;
		debug!("loaded {} contexts from {}", model.states.len(), path.as_ref().display());
		Ok(model)
	}

	fn validate(&self) -> Result<(), ModelError> {
		if self.k == 0 {
			return Err(ModelError::CorruptSnapshot("k must be >= 1".to_owned()));
		}
		for (context, state) in &self.states {
			if context.len() != self.k {
				return Err(ModelError::CorruptSnapshot(format!(
					"context of {} characters, expected {}",
					context.len(),
					self.k
				)));
			}
			state.validate().map_err(ModelError::CorruptSnapshot)?;
		}
		// Generation draws over the sum of all frequencies.
		self.states
			.values()
			.try_fold(0u64, |total, state| total.checked_add(state.frequency()))
			.ok_or_else(|| ModelError::CorruptSnapshot("context frequencies overflow".to_owned()))?;
		Ok(())
	}
}
