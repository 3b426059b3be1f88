//! Pseudo-word generation library.
//!
//! This crate builds a character-level Markov model from seed words and
//! samples new, pronounceable words from it:
//! - Seed normalization into a deduplicated dictionary
//! - Variable-order transition table with shorter-context fallback
//! - Weighted random walks with length bounds and retries
//!
//! ```
//! use pw_gen_core::model::generator::{Generator, DEFAULT_ORDER};
//! use pw_gen_core::model::charset::DEFAULT_CHARSET;
//!
//! # fn main() -> pw_gen_core::error::Result<()> {
//! let generator = Generator::new(vec!["alexander", "sandra", "leander"], DEFAULT_ORDER, DEFAULT_CHARSET)?;
//! let word = generator.sample(Some(4), 12)?;
//! assert!(word.chars().count() <= 12);
//! # Ok(())
//! # }
//! ```

/// Dictionary, transition model and sampler.
pub mod model;

/// Crate error type.
pub mod error;

pub use error::{PwGenError, Result};
pub use model::charset::{Charset, DEFAULT_CHARSET, END_MARKER};
pub use model::dictionary::{Dictionary, Seed};
pub use model::generator::{DEFAULT_ORDER, Generator, GeneratorConfig};
pub use model::sample_options::{DEFAULT_ATTEMPTS, DEFAULT_MAX_LENGTH, EndBehavior, SampleOptions};
pub use model::transition_model::TransitionModel;
