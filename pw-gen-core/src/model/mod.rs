//! Character-level Markov model and pseudo-word sampler.
//!
//! Data flows one way:
//! - Seed strings are normalized into a `Dictionary` over a `Charset`
//! - The dictionary trains a variable-order `TransitionModel`
//! - A `Generator` walks the model to produce new words (`SampleOptions`)

/// Public entry point: construction from seeds and word sampling.
pub mod generator;

/// Allowed alphabet and the start/end marker.
pub mod charset;

/// Seed input and its normalization into a token set.
pub mod dictionary;

/// Context to next-symbol counts, with sequential and parallel training.
pub mod transition_model;

/// Per-context count record and weighted choice.
pub mod transition;

/// Sampling parameters (length bounds, attempts, end-marker handling).
pub mod sample_options;
