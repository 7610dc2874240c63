use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Default probability floor applied to candidates.
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// How the next n-gram is picked among the candidates that passed the threshold.
///
/// # Variants
/// - `FirstOfEqualProbability`: draw one passing candidate uniformly, then keep
///   the first candidate (in corpus order) whose probability equals the drawn
///   one. This is the historical behaviour and does not weight by probability
///   mass: candidates sharing a probability value collapse onto the first one.
/// - `Weighted`: draw proportionally to each candidate's observed count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
	#[default]
	#[serde(rename = "legacy")]
	FirstOfEqualProbability,
	Weighted,
}

/// Parameters of a single generation call.
///
/// `S` is the seed type: a word for unigram/bigram generators, a two-word
/// context for the trigram generator.
///
/// # Invariants
/// - `threshold` is finite and non-negative (values above 1.0 are allowed and
///   simply reject every candidate)
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInput<S> {
	/// Starting word(s). `None` (or an empty word) picks one at random.
	pub seed: Option<S>,

	/// Number of words (or contexts for trigrams) appended after the seed.
	pub length: usize,

	/// Candidates with a probability strictly below this value are dropped.
	threshold: f64,

	/// `true` joins the words without separator, `false` returns the list.
	pub as_text: bool,

	/// Whether an already emitted word may be emitted again.
	pub allow_duplicates: bool,

	pub policy: SelectionPolicy,
}

impl<S> GenerationInput<S> {
	/// Creates an input with the given length and every other field at its default.
	pub fn new(length: usize) -> Self {
		Self {
			seed: None,
			length,
			threshold: DEFAULT_THRESHOLD,
			as_text: true,
			allow_duplicates: false,
			policy: SelectionPolicy::default(),
		}
	}

	/// Returns the current probability threshold.
	pub fn threshold(&self) -> f64 {
		self.threshold
	}

	/// Sets the probability threshold.
	///
	/// # Errors
	/// Returns an error if the value is negative, NaN or infinite.
	pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
		if !threshold.is_finite() || threshold < 0.0 {
			return Err(GenError::InvalidInput(format!(
				"threshold must be a finite value >= 0.0, got {threshold}"
			)));
		}
		self.threshold = threshold;
		Ok(())
	}

	pub fn with_seed(mut self, seed: S) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Builder form of [`set_threshold`](Self::set_threshold).
	pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
		self.set_threshold(threshold)?;
		Ok(self)
	}

	pub fn with_duplicates(mut self, allow_duplicates: bool) -> Self {
		self.allow_duplicates = allow_duplicates;
		self
	}

	pub fn with_text(mut self, as_text: bool) -> Self {
		self.as_text = as_text;
		self
	}

	pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
		self.policy = policy;
		self
	}
}

/// Result of a generation call, shaped by [`GenerationInput::as_text`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
	/// Words concatenated with no delimiter.
	Text(String),
	/// Words in emission order.
	Words(Vec<String>),
}

impl Output {
	pub fn new(words: Vec<String>, as_text: bool) -> Self {
		if as_text {
			Output::Text(words.concat())
		} else {
			Output::Words(words)
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Output::Text(text) => Some(text),
			Output::Words(_) => None,
		}
	}

	pub fn as_words(&self) -> Option<&[String]> {
		match self {
			Output::Text(_) => None,
			Output::Words(words) => Some(words),
		}
	}

	/// Consumes the output; a text output becomes a single element.
	pub fn into_words(self) -> Vec<String> {
		match self {
			Output::Text(text) => vec![text],
			Output::Words(words) => words,
		}
	}
}

impl fmt::Display for Output {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Output::Text(text) => f.write_str(text),
			Output::Words(words) => f.write_str(&words.join(" ")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let input: GenerationInput<String> = GenerationInput::new(3);
		assert_eq!(input.threshold(), DEFAULT_THRESHOLD);
		assert!(input.as_text);
		assert!(!input.allow_duplicates);
		assert_eq!(input.policy, SelectionPolicy::FirstOfEqualProbability);
	}

	#[test]
	fn threshold_validation() {
		let mut input: GenerationInput<String> = GenerationInput::new(3);
		assert!(input.set_threshold(-0.1).is_err());
		assert!(input.set_threshold(f64::NAN).is_err());
		assert!(input.set_threshold(f64::INFINITY).is_err());
		assert!(input.set_threshold(1.1).is_ok());
		assert_eq!(input.threshold(), 1.1);
	}

	#[test]
	fn text_output_has_no_separator() {
		let words = vec!["แมว".to_owned(), "กิน".to_owned(), "ปลา".to_owned()];
		assert_eq!(Output::new(words.clone(), true), Output::Text("แมวกินปลา".to_owned()));
		assert_eq!(Output::new(words, false).to_string(), "แมว กิน ปลา");
	}

	#[test]
	fn into_words_keeps_order_or_wraps_text() {
		let words = vec!["a".to_owned(), "b".to_owned()];
		assert_eq!(Output::new(words.clone(), false).into_words(), words);
		assert_eq!(Output::new(words, true).into_words(), vec!["ab".to_owned()]);
	}
}
