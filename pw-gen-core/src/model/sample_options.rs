use crate::error::{PwGenError, Result};

/// Upper bound on walk steps when none is given.
pub const DEFAULT_MAX_LENGTH: usize = 16;

/// Number of walks tried before giving up on `min_length`.
pub const DEFAULT_ATTEMPTS: usize = 10;

/// What a walk does when the model yields the end marker.
///
/// # Variants
/// - `Skip`: the step is consumed without appending anything and the walk
///   goes on from the same context until `max_length` steps are done.
/// - `Stop`: the attempt ends right away, as a classic Markov chain would.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndBehavior {
	#[default]
	Skip,
	Stop,
}

/// Parameters of a sampling call.
///
/// # Invariants
/// - `attempts >= 1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleOptions {
	/// Minimum accepted length in characters. `None` accepts the first walk.
	pub min_length: Option<usize>,

	/// Number of walk steps, hence the maximum word length.
	pub max_length: usize,

	/// Number of walks before the last one is returned as is.
	attempts: usize,

	/// Handling of the end marker during a walk.
	pub end_behavior: EndBehavior,

	/// Also reject walks producing a word already in the dictionary.
	pub avoid_seed_words: bool,
}

impl Default for SampleOptions {
	fn default() -> Self {
		Self {
			min_length: None,
			max_length: DEFAULT_MAX_LENGTH,
			attempts: DEFAULT_ATTEMPTS,
			end_behavior: EndBehavior::Skip,
			avoid_seed_words: false,
		}
	}
}

impl SampleOptions {
	/// Default options with the given length bounds.
	pub fn new(min_length: Option<usize>, max_length: usize) -> Self {
		Self { min_length, max_length, ..Self::default() }
	}

	/// Returns the number of attempts.
	pub fn attempts(&self) -> usize {
		self.attempts
	}

	/// Sets the number of attempts.
	///
	/// # Errors
	/// Returns an error if `attempts` is zero.
	pub fn set_attempts(&mut self, attempts: usize) -> Result<()> {
		if attempts == 0 {
			return Err(PwGenError::InvalidConfig("attempts must be >= 1".to_owned()));
		}
		self.attempts = attempts;
		Ok(())
	}

	/// Returns `true` if `len` satisfies the minimum length.
	pub(crate) fn long_enough(&self, len: usize) -> bool {
		self.min_length.is_none_or(|min| len >= min)
	}
}
