use std::collections::HashSet;

use log::info;
use serde::Serialize;
use serde_json::Value;

use super::charset::Charset;
use crate::error::PwGenError;

/// Raw training input: a single string or a list of strings.
///
/// Typed sources convert infallibly through `From`. Dynamic values (for
/// example a parsed JSON document) go through `TryFrom<Value>`, which is the
/// only place an invalid seed can be rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
	One(String),
	Many(Vec<String>),
}

impl Seed {
	/// Iterates over the seed strings, a single seed yielding one item.
	pub fn strings(&self) -> impl Iterator<Item = &str> {
		let items: &[String] = match self {
			Seed::One(s) => std::slice::from_ref(s),
			Seed::Many(v) => v.as_slice(),
		};
		items.iter().map(String::as_str)
	}

	/// Number of seed strings.
	pub fn len(&self) -> usize {
		match self {
			Seed::One(_) => 1,
			Seed::Many(v) => v.len(),
		}
	}

	/// `true` for an empty list of seeds.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<&str> for Seed {
	fn from(value: &str) -> Self {
		Seed::One(value.to_owned())
	}
}

impl From<String> for Seed {
	fn from(value: String) -> Self {
		Seed::One(value)
	}
}

impl From<Vec<String>> for Seed {
	fn from(value: Vec<String>) -> Self {
		Seed::Many(value)
	}
}

impl From<Vec<&str>> for Seed {
	fn from(value: Vec<&str>) -> Self {
		Seed::Many(value.into_iter().map(str::to_owned).collect())
	}
}

impl From<&[&str]> for Seed {
	fn from(value: &[&str]) -> Self {
		Seed::Many(value.iter().map(|s| (*s).to_owned()).collect())
	}
}

impl<const N: usize> From<[&str; N]> for Seed {
	fn from(value: [&str; N]) -> Self {
		Seed::Many(value.iter().map(|s| (*s).to_owned()).collect())
	}
}

impl TryFrom<Value> for Seed {
	type Error = PwGenError;

	/// Accepts a JSON string or an array made only of strings.
	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(s) => Ok(Seed::One(s)),
			Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(i, item)| match item {
					Value::String(s) => Ok(s),
					other => Err(PwGenError::InvalidSeed(format!(
						"element {i} is {}",
						json_kind(&other)
					))),
				})
				.collect::<Result<Vec<_>, _>>()
				.map(Seed::Many),
			other => Err(PwGenError::InvalidSeed(format!("got {}", json_kind(&other)))),
		}
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Deduplicated set of normalized tokens used to train the model.
///
/// Each seed string is lowercased, stripped of characters outside the
/// charset, then split on `' '`. Empty pieces (from an empty seed or from
/// consecutive spaces) are kept as tokens: they train the `$ -> $` transition.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
	tokens: HashSet<String>,
}

impl Dictionary {
	/// Normalizes every seed string and accumulates its tokens.
	pub fn build(seed: &Seed, charset: &Charset) -> Self {
		info!("Generating dictionary...");
		let mut tokens = HashSet::new();
		for raw in seed.strings() {
			let normalized = charset.normalize(raw);
			tokens.extend(normalized.split(' ').map(str::to_owned));
		}
		info!("Dictionary ready: {} tokens from {} seeds", tokens.len(), seed.len());
		Self { tokens }
	}

	/// Returns `true` if `token` is part of the dictionary.
	pub fn contains(&self, token: &str) -> bool {
		self.tokens.contains(token)
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Iterates over tokens in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}
}
