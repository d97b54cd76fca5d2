use indexmap::IndexMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::sampler::locate_linear;

/// Represents a context (k-gram) state in the model.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations. The context itself is the
/// key under which the state is stored by `LanguageModel`.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Track how many times the context was observed
/// - Predict the next character using exact weighted random sampling
///
/// ## Invariants
/// - `frequency` equals the sum of all transition counts
/// - Each transition occurrence count is strictly positive
/// - Transitions keep their first-observation order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Number of times the context was observed during training.
	frequency: u64,
	/// Outgoing transitions indexed by the next character.
	/// Example: { 'e' => 42, 'a' => 3 }
	transitions: IndexMap<char, u64>,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next_char`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	pub fn add_transition(&mut self, next_char: char) {
		*self.transitions.entry(next_char).or_insert(0) += 1;
		self.frequency += 1;
	}

	/// Number of times this context was observed.
	pub fn frequency(&self) -> u64 {
		self.frequency
	}

	/// Number of times `next_char` followed this context (0 if never).
	pub fn count(&self, next_char: char) -> u64 {
		self.transitions.get(&next_char).copied().unwrap_or(0)
	}

	/// Successors and their counts, in first-observation order.
	pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
		self.transitions.iter().map(|(c, n)| (*c, *n))
	}

	/// Returns the successor owning `point` in `[0, frequency)`.
	///
	/// Successor `i` owns as many consecutive points as its count, so
	/// drawing `point` uniformly gives an exact weighted choice.
	pub(crate) fn select(&self, point: u64) -> Option<char> {
		let index = locate_linear(self.transitions.values().copied(), point)?;
		self.transitions.get_index(index).map(|(c, _)| *c)
	}

	/// Predicts the next character using weighted random sampling.
	///
	/// The probability of selecting a character is proportional to its
	/// occurrence count. O(n) scan over the transitions, no allocation.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		if self.frequency == 0 {
			return None;
		}
		self.select(rng.random_range(0..self.frequency))
	}

	/// Checks the invariants of a state that did not come from training.
	pub(crate) fn validate(&self) -> Result<(), String> {
		if self.transitions.is_empty() {
			return Err("state without transitions".to_owned());
		}
		if self.transitions.values().any(|n| *n == 0) {
			return Err("transition with a zero count".to_owned());
		}
		let sum = self
			.transitions
			.values()
			.try_fold(0u64, |acc, n| acc.checked_add(*n))
			.ok_or_else(|| "transition counts overflow".to_owned())?;
		if sum != self.frequency {
			return Err(format!("frequency {} does not match transition total {}", self.frequency, sum));
		}
		Ok(())
	}
}
