use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::frequency::FrequencyTable;
use super::generator::SentenceGenerator;
use super::input::{GenerationInput, SelectionPolicy};
use super::selection::{Candidate, conditional, weighted};
use crate::corpus::CorpusProvider;
use crate::error::Result;

/// Generator drawing every word independently from the unigram distribution.
///
/// # Responsibilities
/// - Compute `P(word) = count(word) / N` once at construction
/// - Build the pool of words passing the threshold for each call
/// - Draw words from the pool, shrinking it when duplicates are disallowed
///
/// # Invariants
/// - `words[i]` and `probabilities[i]` describe the same vocabulary entry
/// - probabilities sum to 1.0 (or are all 0.0 for an empty/zero-count table)
#[derive(Clone, Debug)]
pub struct Unigram {
	name: String,
	counts: Arc<FrequencyTable<1>>,
	words: Vec<String>,
	probabilities: Vec<f64>,
}

impl Unigram {
	pub const DEFAULT_LENGTH: usize = 3;

	/// Loads the unigram table of `corpus` from `provider`.
	///
	/// # Errors
	/// Returns the provider's error for unknown or unsupported corpora.
	pub fn new<P: CorpusProvider + ?Sized>(provider: &P, corpus: &str) -> Result<Self> {
		Ok(Self::from_table(corpus, provider.load_unigram(corpus)?))
	}

	/// Builds the generator from an owned or shared unigram table.
	pub fn from_table(name: &str, counts: impl Into<Arc<FrequencyTable<1>>>) -> Self {
		let counts = counts.into();
		let total = counts.total();
		let words: Vec<String> = counts.iter().map(|([word], _)| word.clone()).collect();
		let probabilities = counts.iter().map(|(_, count)| conditional(count, total)).collect();
		Self { name: name.to_owned(), counts, words, probabilities }
	}

	/// Marginal probability of `word` (0.0 when unseen).
	pub fn probability(&self, word: &str) -> f64 {
		conditional(self.counts.word_count(word), self.counts.total())
	}

	/// Vocabulary in corpus order.
	pub fn vocabulary(&self) -> &[String] {
		&self.words
	}

	/// Index into `pool` of the next word, or `None` if the pool is empty.
	fn pick<R: Rng + ?Sized>(&self, rng: &mut R, pool: &[usize], policy: SelectionPolicy) -> Option<usize> {
		match policy {
			SelectionPolicy::Weighted => {
				let candidates: Vec<Candidate<usize>> = pool
					.iter()
					.enumerate()
					.map(|(position, &index)| Candidate {
						item: position,
						probability: self.probabilities[index],
						count: self.counts.get(index).map(|(_, count)| count).unwrap_or(0),
					})
					.collect();
				weighted(rng, &candidates)
			}
			SelectionPolicy::FirstOfEqualProbability => {
				if pool.is_empty() {
					None
				} else {
					Some(rng.random_range(0..pool.len()))
				}
			}
		}
	}
}

impl SentenceGenerator for Unigram {
	type Seed = String;

	fn name(&self) -> &str {
		&self.name
	}

	fn make_input(&self) -> GenerationInput<String> {
		GenerationInput::new(Self::DEFAULT_LENGTH)
	}

	/// Emits the seed (lowercased, unfiltered) followed by up to `length` words.
	///
	/// `length` is clamped to the number of words passing the threshold. When
	/// duplicates are disallowed the seed and every drawn word are removed from
	/// the pool, and generation stops once the pool is exhausted.
	fn generate_words<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput<String>) -> Vec<String> {
		let seed = match input.seed.as_deref().filter(|seed| !seed.is_empty()) {
			Some(seed) => seed.to_lowercase(),
			None => match self.words.choose(rng) {
				Some(word) => word.to_lowercase(),
				None => return Vec::new(),
			},
		};

		let mut pool: Vec<usize> = (0..self.words.len())
			.filter(|&index| self.probabilities[index] >= input.threshold())
			.collect();
		let length = input.length.min(pool.len());
		if !input.allow_duplicates {
			pool.retain(|&index| self.words[index] != seed);
		}

		let mut sentence = Vec::with_capacity(length + 1);
		sentence.push(seed);
		for _ in 0..length {
			let Some(position) = self.pick(rng, &pool, input.policy) else {
				debug!("{}: candidate pool exhausted after {} words", self.name, sentence.len());
				break;
			};
			let index = if input.allow_duplicates { pool[position] } else { pool.remove(position) };
			sentence.push(self.words[index].clone());
		}
		sentence
	}
}
