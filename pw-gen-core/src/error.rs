//! Error type shared by every stage of the generator.

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = PwGenError> = std::result::Result<T, E>;

/// Failures raised while building a generator or drawing words from it.
///
/// Construction errors are fatal to that construction: no partially built
/// generator is ever returned alongside them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PwGenError {
	/// The seed was neither a string nor a sequence of strings.
	#[error("seed must be a string or an array of strings: {0}")]
	InvalidSeed(String),

	/// The charset cannot be used to build a model.
	#[error("malformed charset: {0}")]
	MalformedCharset(String),

	/// The Markov order must be at least 1.
	#[error("order must be >= 1, got {0}")]
	InvalidOrder(usize),

	/// Sampling or generator parameters are out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Two transition models with a different order or charset cannot be merged.
	#[error("cannot merge models: {0}")]
	ModelMismatch(String),

	/// The model has no contexts (the dictionary was empty).
	#[error("no transitions available for sampling")]
	EmptyModel,
}
