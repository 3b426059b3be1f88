use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{PwGenError, Result};

/// Marks both the start context and the end of a token.
pub const END_MARKER: char = '$';

/// Lowercase Latin letters plus the space used to split tokens.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz ";

/// Ordered alphabet the model operates over.
///
/// Each character owns a stable index in `0..len()`; the end marker takes the
/// extra slot `len()`. Transition entries store their counts in that order.
///
/// # Invariants
/// - No duplicate characters (first occurrence wins)
/// - Never contains `END_MARKER`
/// - Never empty
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Charset {
	chars: Vec<char>,
	#[serde(skip)]
	index: HashMap<char, usize>,
}

impl Charset {
	/// Builds a charset from its textual form.
	///
	/// Characters are used literally: `]`, `^`, `\` or `-` are ordinary members
	/// since filtering is a membership test, not a pattern.
	///
	/// # Errors
	/// `MalformedCharset` if the input is empty or contains `END_MARKER`.
	pub fn new(charset: &str) -> Result<Self> {
		if charset.is_empty() {
			return Err(PwGenError::MalformedCharset("charset is empty".to_owned()));
		}

		let mut chars = Vec::new();
		let mut index = HashMap::new();
		for c in charset.chars() {
			if c == END_MARKER {
				return Err(PwGenError::MalformedCharset(format!(
					"'{END_MARKER}' is reserved for the start/end marker"
				)));
			}
			if !index.contains_key(&c) {
				index.insert(c, chars.len());
				chars.push(c);
			}
		}

		Ok(Self { chars, index })
	}

	/// Returns `true` if `c` belongs to the alphabet.
	pub fn contains(&self, c: char) -> bool {
		self.index.contains_key(&c)
	}

	/// Number of characters, excluding the end marker.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	/// Always `false`: an empty charset is rejected at construction.
	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Number of symbols a transition entry tracks (characters + end marker).
	pub(crate) fn symbol_count(&self) -> usize {
		self.chars.len() + 1
	}

	/// Slot of a symbol, `END_MARKER` included.
	pub(crate) fn symbol_index(&self, symbol: char) -> Option<usize> {
		if symbol == END_MARKER {
			Some(self.chars.len())
		} else {
			self.index.get(&symbol).copied()
		}
	}

	/// Symbol stored at `index`; `len()` maps to `END_MARKER`.
	pub(crate) fn symbol_at(&self, index: usize) -> char {
		self.chars.get(index).copied().unwrap_or(END_MARKER)
	}

	/// Iterates over the characters in charset order.
	pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
		self.chars.iter().copied()
	}

	/// Lowercases `text` and drops every character outside the alphabet.
	pub fn normalize(&self, text: &str) -> String {
		text.chars()
			.flat_map(char::to_lowercase)
			.filter(|c| self.contains(*c))
			.collect()
	}
}

impl Default for Charset {
	fn default() -> Self {
		// No duplicates and no marker in the default alphabet
		let chars: Vec<char> = DEFAULT_CHARSET.chars().collect();
		let index = chars.iter().enumerate().map(|(i, c)| (*c, i)).collect();
		Self { chars, index }
	}
}

impl fmt::Display for Charset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.chars.iter().try_for_each(|c| write!(f, "{c}"))
	}
}
