use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use super::charset::{Charset, END_MARKER};
use super::dictionary::Dictionary;
use super::transition::TransitionEntry;
use crate::error::{PwGenError, Result};

/// Dictionaries at least this large are trained on worker threads.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Chunks per CPU when training in parallel.
const CHUNK_FACTOR: usize = 8;

/// Variable-order character transition table.
///
/// Maps every context observed in the dictionary (1..=`order` trailing
/// characters, or `"$"` for the beginning of a token) to the counts of the
/// symbol that followed it. Every token contributes once per order, so short
/// contexts are always populated and can serve as fallback for longer ones.
///
/// # Invariants
/// - `order >= 1`
/// - Every entry tracks exactly `charset.len() + 1` symbols
/// - Read-only once built; sampling never mutates it
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TransitionModel {
	order: usize,
	charset: Charset,
	entries: HashMap<String, TransitionEntry>,
}

impl TransitionModel {
	/// Creates a model with no contexts.
	///
	/// # Errors
	/// `InvalidOrder` if `order == 0`.
	pub fn empty(order: usize, charset: Charset) -> Result<Self> {
		if order == 0 {
			return Err(PwGenError::InvalidOrder(order));
		}
		Ok(Self { order, charset, entries: HashMap::new() })
	}

	/// Trains a model over every token of `dictionary`.
	///
	/// Small dictionaries are processed inline; from `PARALLEL_THRESHOLD`
	/// tokens on, the work is split across threads (see `build_parallel`).
	/// Both paths produce the same model.
	pub fn build(dictionary: &Dictionary, order: usize, charset: &Charset) -> Result<Self> {
		info!("Generating transition matrix...");
		let model = if dictionary.len() >= PARALLEL_THRESHOLD {
			Self::build_parallel(dictionary, order, charset)?
		} else {
			Self::build_sequential(dictionary, order, charset)?
		};
		info!("Transition matrix ready: {} contexts (order {})", model.len(), model.order);
		Ok(model)
	}

	/// Trains a model on the current thread.
	pub fn build_sequential(dictionary: &Dictionary, order: usize, charset: &Charset) -> Result<Self> {
		let mut model = Self::empty(order, charset.clone())?;
		for token in dictionary.iter() {
			model.add_token(token);
		}
		Ok(model)
	}

	/// Splits the tokens into chunks, trains partial models in parallel and
	/// merges them.
	///
	/// # Behavior
	/// - Chunk count is the number of CPUs times a fixed factor.
	/// - Each scoped thread trains a partial model and sends it over a channel.
	/// - Partial models are merged sequentially once every thread is done.
	pub fn build_parallel(dictionary: &Dictionary, order: usize, charset: &Charset) -> Result<Self> {
		let mut model = Self::empty(order, charset.clone())?;

		let tokens: Vec<&str> = dictionary.iter().collect();
		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = tokens.len().div_ceil(chunks).max(1);
		debug!("Training {} tokens in chunks of {}", tokens.len(), chunk_size);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in tokens.chunks(chunk_size) {
				let tx = tx.clone();
				let partial_charset = charset.clone();
				scope.spawn(move || {
					let mut partial = Self { order, charset: partial_charset, entries: HashMap::new() };
					for token in chunk {
						partial.add_token(token);
					}
					// The receiver lives until every worker is joined
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		for partial in rx.iter() {
			model.merge(&partial)?;
		}

		Ok(model)
	}

	/// Records every transition of `token`, for each order from `order` down to 1.
	///
	/// For a pointer `p` in `0..=len`, the next symbol is `token[p]` (or the end
	/// marker at `p == len`) and the context is `"$"` at `p == 0`, otherwise the
	/// `min(o, p)` characters right before `p`.
	///
	/// `token` must be normalized to the model charset; characters outside of
	/// it are ignored.
	pub(crate) fn add_token(&mut self, token: &str) {
		let chars: Vec<char> = token.chars().collect();
		let symbol_count = self.charset.symbol_count();

		for o in (1..=self.order).rev() {
			for p in 0..=chars.len() {
				let next = if p < chars.len() { chars[p] } else { END_MARKER };
				let Some(slot) = self.charset.symbol_index(next) else {
					continue;
				};

				let context: String = if p == 0 {
					END_MARKER.to_string()
				} else {
					chars[p.saturating_sub(o)..p].iter().collect()
				};

				self.entries
					.entry(context)
					.or_insert_with(|| TransitionEntry::new(symbol_count))
					.add_transition(slot);
			}
		}
	}

	/// Merges another model into this one, summing counts per context.
	///
	/// # Errors
	/// `ModelMismatch` if the orders or charsets differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(PwGenError::ModelMismatch(format!(
				"order {} vs {}",
				self.order, other.order
			)));
		}
		if self.charset != other.charset {
			return Err(PwGenError::ModelMismatch(format!(
				"charset {:?} vs {:?}",
				self.charset.to_string(),
				other.charset.to_string()
			)));
		}

		for (context, entry) in &other.entries {
			if let Some(existing) = self.entries.get_mut(context) {
				existing.merge(entry);
			} else {
				self.entries.insert(context.clone(), entry.clone());
			}
		}

		Ok(())
	}

	/// Picks the symbol following `context`.
	///
	/// While `context` is unknown, its leading character is dropped. Returns
	/// the end marker if the context is shortened away without a match.
	pub(crate) fn next_symbol<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> char {
		let mut key = context;
		while !key.is_empty() {
			if let Some(entry) = self.entries.get(key) {
				return entry
					.choose(rng)
					.map_or(END_MARKER, |slot| self.charset.symbol_at(slot));
			}
			let mut rest = key.chars();
			rest.next();
			key = rest.as_str();
		}
		END_MARKER
	}

	/// Returns the entry recorded for `context`, if any.
	pub fn entry(&self, context: &str) -> Option<&TransitionEntry> {
		self.entries.get(context)
	}

	/// Count of `symbol` after `context`.
	///
	/// `None` if the context was never observed or the symbol is not part of
	/// the charset; `Some(0)` for a known pair that never occurred.
	pub fn count(&self, context: &str, symbol: char) -> Option<usize> {
		let slot = self.charset.symbol_index(symbol)?;
		Some(self.entries.get(context)?.count(slot))
	}

	/// Iterates over `(context, entry)` pairs in no particular order.
	pub fn contexts(&self) -> impl Iterator<Item = (&str, &TransitionEntry)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn charset(&self) -> &Charset {
		&self.charset
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::dictionary::Seed;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn model_from(seed: impl Into<Seed>, order: usize) -> TransitionModel {
		let charset = Charset::default();
		let dictionary = Dictionary::build(&seed.into(), &charset);
		TransitionModel::build(&dictionary, order, &charset).unwrap()
	}

	#[test]
	fn order_one_bigrams() {
		let model = model_from("ab ab", 1);
		assert_eq!(model.count("$", 'a'), Some(1));
		assert_eq!(model.count("a", 'b'), Some(1));
		assert_eq!(model.count("b", '$'), Some(1));
		assert_eq!(model.count("a", 'z'), Some(0));
		assert_eq!(model.len(), 3);
	}

	#[test]
	fn order_two_keeps_shorter_contexts() {
		let model = model_from("abc", 2);
		// Start context is observed once per order
		assert_eq!(model.count("$", 'a'), Some(2));
		assert_eq!(model.count("a", 'b'), Some(2));
		assert_eq!(model.count("ab", 'c'), Some(1));
		assert_eq!(model.count("b", 'c'), Some(1));
		assert_eq!(model.count("bc", '$'), Some(1));
		assert_eq!(model.count("c", '$'), Some(1));
		assert_eq!(model.entry("abc"), None);
	}

	#[test]
	fn entries_cover_every_symbol() {
		let model = model_from("ab", 2);
		for (_, entry) in model.contexts() {
			assert_eq!(entry.counts().len(), 28);
			assert_eq!(entry.total(), entry.counts().iter().sum::<usize>());
		}
	}

	#[test]
	fn empty_token_trains_start_to_end() {
		let model = model_from("", 2);
		assert_eq!(model.len(), 1);
		assert_eq!(model.count("$", '$'), Some(2));
	}

	#[test]
	fn empty_dictionary_has_no_contexts() {
		let model = model_from(Vec::<String>::new(), 2);
		assert!(model.is_empty());
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(model.next_symbol("$", &mut rng), END_MARKER);
	}

	#[test]
	fn zero_order_is_rejected() {
		assert_eq!(
			TransitionModel::empty(0, Charset::default()),
			Err(PwGenError::InvalidOrder(0))
		);
	}

	#[test]
	fn unknown_context_falls_back_to_suffix() {
		let model = model_from("ab", 2);
		let mut rng = StdRng::seed_from_u64(3);
		// "zb" is unknown, "b" is only ever followed by the end marker
		assert_eq!(model.next_symbol("zb", &mut rng), END_MARKER);
		// "xa" falls back to "a", always followed by 'b'
		assert_eq!(model.next_symbol("xa", &mut rng), 'b');
		assert_eq!(model.next_symbol("xyz", &mut rng), END_MARKER);
	}

	#[test]
	fn merge_matches_single_build() {
		let charset = Charset::default();
		let all = Dictionary::build(&Seed::from(vec!["alpha", "beta", "gamma"]), &charset);
		let left = Dictionary::build(&Seed::from(vec!["alpha", "beta"]), &charset);
		let right = Dictionary::build(&Seed::from("gamma"), &charset);

		let mut merged = TransitionModel::build(&left, 2, &charset).unwrap();
		merged.merge(&TransitionModel::build(&right, 2, &charset).unwrap()).unwrap();
		assert_eq!(merged, TransitionModel::build(&all, 2, &charset).unwrap());
	}

	#[test]
	fn merge_rejects_mismatches() {
		let mut model = model_from("ab", 2);
		let other_order = model_from("ab", 3);
		assert!(matches!(model.merge(&other_order), Err(PwGenError::ModelMismatch(_))));

		let charset = Charset::new("ab").unwrap();
		let dictionary = Dictionary::build(&Seed::from("ab"), &charset);
		let other_charset = TransitionModel::build(&dictionary, 2, &charset).unwrap();
		assert!(matches!(model.merge(&other_charset), Err(PwGenError::ModelMismatch(_))));
	}

	#[test]
	fn parallel_build_matches_sequential() {
		let charset = Charset::default();
		let words: Vec<String> = (0..500).map(|i| format!("w{}ord{}", i % 7, i % 13)).collect();
		let seed: Vec<String> = words
			.iter()
			.enumerate()
			.map(|(i, w)| format!("{w}{}", char::from(b'a' + (i % 26) as u8)))
			.collect();
		let dictionary = Dictionary::build(&Seed::from(seed), &charset);
		assert_eq!(
			TransitionModel::build_parallel(&dictionary, 3, &charset).unwrap(),
			TransitionModel::build_sequential(&dictionary, 3, &charset).unwrap()
		);
	}
}
