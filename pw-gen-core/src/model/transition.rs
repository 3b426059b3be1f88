use rand::Rng;

use serde::Serialize;

/// Observed next-symbol counts for one context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations. Counts are stored in a fixed
/// array indexed by symbol slot (see `Charset::symbol_index`): one slot per
/// charset character plus a last slot for the end marker.
///
/// ## Invariants
/// - `counts.len()` equals the charset symbol count, every slot exists even at 0
/// - `total` is the sum of all counts
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TransitionEntry {
	/// Occurrences per symbol slot.
	counts: Vec<usize>,
	/// Sum of `counts`.
	total: usize,
}

impl TransitionEntry {
	/// Creates an entry with every symbol initialized to zero.
	pub(crate) fn new(symbol_count: usize) -> Self {
		Self {
			counts: vec![0; symbol_count],
			total: 0,
		}
	}

	/// Records one occurrence of the symbol at `slot`.
	pub(crate) fn add_transition(&mut self, slot: usize) {
		self.counts[slot] += 1;
		self.total += 1;
	}

	/// Per-slot counts, in charset order with the end marker last.
	pub fn counts(&self) -> &[usize] {
		&self.counts
	}

	/// Count of the symbol at `slot`.
	pub fn count(&self, slot: usize) -> usize {
		self.counts.get(slot).copied().unwrap_or(0)
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Picks a symbol slot with probability `count / total`.
	///
	/// Slots are visited in ascending count order (stable, so equal counts keep
	/// charset order) while accumulating a running total; the first slot whose
	/// running total exceeds a uniform draw in `[0, total)` wins. Zero-count
	/// slots can never be selected.
	///
	/// Returns `None` if nothing was ever observed.
	pub(crate) fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
		if self.total == 0 {
			return None;
		}

		let mut order: Vec<usize> = (0..self.counts.len()).collect();
		order.sort_by_key(|&slot| self.counts[slot]);

		let r = rng.random_range(0..self.total);
		let mut running = 0;
		for slot in order {
			running += self.counts[slot];
			if r < running {
				return Some(slot);
			}
		}

		// Unreachable while `total` matches the counts
		None
	}

	/// Adds the counts of `other` into this entry.
	///
	/// Both entries must come from the same charset; the caller checks it.
	pub(crate) fn merge(&mut self, other: &Self) {
		for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
			*mine += *theirs;
		}
		self.total += other.total;
	}
}
