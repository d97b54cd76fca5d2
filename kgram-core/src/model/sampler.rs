use rand::Rng;

/// Running sums over a table of integer weights.
///
/// Drawing a uniform integer in `[0, total)` and locating it among the
/// running sums selects index `i` with probability `weights[i] / total`,
/// exactly, without any floating point normalization.
///
/// Zero weights occupy an empty interval and are never selected.
#[derive(Debug, Clone, Default)]
pub struct CumulativeWeights {
	sums: Vec<u64>,
}

impl CumulativeWeights {
	/// Builds the running sums of `weights`, in iteration order.
	///
	/// The running total saturates at `u64::MAX`; weights past that point
	/// get an empty interval.
	pub fn new<I>(weights: I) -> Self
	where
		I: IntoIterator<Item = u64>,
	{
		let weights = weights.into_iter();
		let mut sums = Vec::with_capacity(weights.size_hint().0);
		let mut total: u64 = 0;
		for weight in weights {
			total = total.saturating_add(weight);
			sums.push(total);
		}
		Self { sums }
	}

	/// Sum of all weights.
	pub fn total(&self) -> u64 {
		self.sums.last().copied().unwrap_or(0)
	}

	pub fn len(&self) -> usize {
		self.sums.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sums.is_empty()
	}

	/// Returns the index whose interval contains `point`.
	///
	/// Index `i` owns `[sums[i-1], sums[i])`. Binary search over the
	/// running sums, O(log n). `None` if `point >= total`.
	pub fn locate(&self, point: u64) -> Option<usize> {
		if point >= self.total() {
			return None;
		}
		Some(self.sums.partition_point(|&sum| sum <= point))
	}

	/// Draws one index with probability proportional to its weight.
	///
	/// Returns `None` when the table is empty or every weight is zero.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
		let total = self.total();
		if total == 0 {
			return None;
		}
		self.locate(rng.random_range(0..total))
	}
}

/// Linear-scan counterpart of [`CumulativeWeights::locate`].
///
/// Walks `weights` subtracting each one from `point` until it falls inside a
/// bucket. Does not allocate, which suits the short successor lists drawn
/// from on every generated character.
pub fn locate_linear<I>(weights: I, mut point: u64) -> Option<usize>
where
	I: IntoIterator<Item = u64>,
{
	for (index, weight) in weights.into_iter().enumerate() {
		if point < weight {
			return Some(index);
		}
		point -= weight;
	}
	None
}
