use log::{debug, trace};
use rand::Rng;
use serde_json::Value;

use super::charset::{Charset, DEFAULT_CHARSET, END_MARKER};
use super::dictionary::{Dictionary, Seed};
use super::sample_options::{EndBehavior, SampleOptions};
use super::transition_model::TransitionModel;
use crate::error::{PwGenError, Result};

/// Markov order used when none is given.
pub const DEFAULT_ORDER: usize = 2;

/// Construction parameters of a `Generator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
	/// Maximum context length (>= 1).
	pub order: usize,
	/// Allowed characters, used literally.
	pub charset: String,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self { order: DEFAULT_ORDER, charset: DEFAULT_CHARSET.to_owned() }
	}
}

impl GeneratorConfig {
	/// Returns a builder initialised with [`GeneratorConfig::default`].
	#[must_use]
	pub fn builder() -> GeneratorConfigBuilder {
		GeneratorConfigBuilder::default()
	}

	/// Checks the order and parses the charset.
	pub fn validate(&self) -> Result<Charset> {
		if self.order == 0 {
			return Err(PwGenError::InvalidOrder(self.order));
		}
		Charset::new(&self.charset)
	}
}

/// Builder for [`GeneratorConfig`].
#[derive(Clone, Debug, Default)]
pub struct GeneratorConfigBuilder {
	config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
	#[must_use]
	pub fn order(mut self, order: usize) -> Self {
		self.config.order = order;
		self
	}

	#[must_use]
	pub fn charset(mut self, charset: impl Into<String>) -> Self {
		self.config.charset = charset.into();
		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<GeneratorConfig> {
		self.config.validate()?;
		Ok(self.config)
	}
}

/// Pseudo-word generator: a dictionary and the transition model trained on it.
///
/// # Responsibilities
/// - Normalize the seed into a `Dictionary`
/// - Train the `TransitionModel` once, at construction
/// - Draw words by weighted random walks, retrying until the length constraint holds
///
/// The generator is immutable once built. Sampling only reads the model, so a
/// shared `&Generator` can be sampled from several threads.
#[derive(Clone, Debug)]
pub struct Generator {
	dictionary: Dictionary,
	model: TransitionModel,
}

impl Generator {
	/// Builds a generator from a seed, an order and a charset.
	///
	/// # Errors
	/// - `InvalidOrder` if `order == 0`
	/// - `MalformedCharset` if the charset is empty or contains `$`
	pub fn new(seed: impl Into<Seed>, order: usize, charset: &str) -> Result<Self> {
		Self::from_config(seed, &GeneratorConfig { order, charset: charset.to_owned() })
	}

	/// Builds a generator from a seed and a configuration.
	pub fn from_config(seed: impl Into<Seed>, config: &GeneratorConfig) -> Result<Self> {
		let charset = config.validate()?;
		let dictionary = Dictionary::build(&seed.into(), &charset);
		let model = TransitionModel::build(&dictionary, config.order, &charset)?;
		Ok(Self { dictionary, model })
	}

	/// Builds a generator from a dynamic value (typically parsed JSON).
	///
	/// # Errors
	/// `InvalidSeed` unless `value` is a string or an array of strings; no
	/// generator is built in that case.
	pub fn from_value(value: Value, config: &GeneratorConfig) -> Result<Self> {
		let seed = Seed::try_from(value)?;
		Self::from_config(seed, config)
	}

	pub fn dictionary(&self) -> &Dictionary {
		&self.dictionary
	}

	pub fn model(&self) -> &TransitionModel {
		&self.model
	}

	pub fn order(&self) -> usize {
		self.model.order()
	}

	pub fn charset(&self) -> &Charset {
		self.model.charset()
	}

	/// Draws a word of at most `max_length` characters using the thread RNG.
	///
	/// Up to `DEFAULT_ATTEMPTS` walks are made until one reaches `min_length`;
	/// otherwise the last walk is returned.
	///
	/// # Errors
	/// `EmptyModel` if the generator was built from no seed at all.
	pub fn sample(&self, min_length: Option<usize>, max_length: usize) -> Result<String> {
		self.sample_options(&SampleOptions::new(min_length, max_length))
	}

	/// Draws a word with explicit options using the thread RNG.
	pub fn sample_options(&self, options: &SampleOptions) -> Result<String> {
		self.sample_with_rng(options, &mut rand::rng())
	}

	/// Draws `count` words, each one sampled independently.
	pub fn sample_many(&self, count: usize, options: &SampleOptions) -> Result<Vec<String>> {
		let mut rng = rand::rng();
		(0..count).map(|_| self.sample_with_rng(options, &mut rng)).collect()
	}

	/// Draws a word using the provided random source.
	///
	/// With a seeded RNG the output is reproducible for a given seed, order
	/// and charset.
	///
	/// # Behavior
	/// - Each attempt starts from an empty word and the `$` context.
	/// - An attempt is accepted if it reaches `min_length` (and, with
	///   `avoid_seed_words`, is not a dictionary token).
	/// - When every attempt is rejected, the last one is returned.
	pub fn sample_with_rng<R: Rng + ?Sized>(&self, options: &SampleOptions, rng: &mut R) -> Result<String> {
		if self.model.is_empty() {
			return Err(PwGenError::EmptyModel);
		}

		let mut word = String::new();
		for attempt in 0..options.attempts() {
			let (candidate, len) = self.walk(options.max_length, options.end_behavior, rng);
			word = candidate;

			if !options.long_enough(len) {
				debug!("attempt {}: {:?} shorter than {:?}", attempt + 1, word, options.min_length);
				continue;
			}
			if options.avoid_seed_words && self.dictionary.contains(&word.to_lowercase()) {
				debug!("attempt {}: {:?} already in the dictionary", attempt + 1, word);
				continue;
			}
			return Ok(word);
		}

		Ok(word)
	}

	/// Performs one random walk of at most `max_length` steps.
	///
	/// Returns the word and its length in characters.
	fn walk<R: Rng + ?Sized>(&self, max_length: usize, end_behavior: EndBehavior, rng: &mut R) -> (String, usize) {
		let mut word = String::new();
		let mut len = 0;
		let mut context = END_MARKER.to_string();

		for step in 0..max_length {
			let next = self.model.next_symbol(&context, rng);
			trace!("{step}: {context} -> {next} ({word})");

			if next == END_MARKER {
				match end_behavior {
					EndBehavior::Skip => continue,
					EndBehavior::Stop => break,
				}
			}

			word.push(next);
			len += 1;
			context = last_n_chars(&word, len, self.model.order());
		}

		(word, len)
	}
}

/// Returns the last `n` characters of `s`, whose length is `len` characters.
///
/// If `n` is greater than the number of characters in `s`, the entire string
/// is returned. UTF-8 safe.
fn last_n_chars(s: &str, len: usize, n: usize) -> String {
	s.chars().skip(len.saturating_sub(n)).collect()
}
