use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::frequency::FrequencyTable;
use super::generator::SentenceGenerator;
use super::input::GenerationInput;
use super::selection::{Candidate, conditional, select};
use crate::corpus::CorpusProvider;
use crate::error::Result;

/// Generator conditioning each word on the previous one.
///
/// `P(w2 | w1) = count(w1, w2) / count(w1)`, with 0.0 whenever the context
/// word was never counted or the pair is absent.
///
/// Candidate sets are read from `followers`, an index built once from the
/// bigram table: context word → positions of the bigrams starting with it,
/// in table order.
#[derive(Clone, Debug)]
pub struct Bigram {
	name: String,
	unigrams: Arc<FrequencyTable<1>>,
	bigrams: Arc<FrequencyTable<2>>,
	vocabulary: Vec<String>,
	followers: HashMap<String, Vec<usize>>,
}

impl Bigram {
	pub const DEFAULT_LENGTH: usize = 4;

	/// Loads the unigram and bigram tables of `corpus`.
	///
	/// # Errors
	/// Returns the provider's error for unknown or unsupported corpora.
	pub fn new<P: CorpusProvider + ?Sized>(provider: &P, corpus: &str) -> Result<Self> {
		let unigrams = provider.load_unigram(corpus)?;
		let bigrams = provider.load_bigram(corpus)?;
		Ok(Self::from_tables(corpus, Arc::new(unigrams), Arc::new(bigrams)))
	}

	pub fn from_tables(name: &str, unigrams: Arc<FrequencyTable<1>>, bigrams: Arc<FrequencyTable<2>>) -> Self {
		let mut followers: HashMap<String, Vec<usize>> = HashMap::new();
		for (index, ([first, _], _)) in bigrams.iter().enumerate() {
			followers.entry(first.clone()).or_default().push(index);
		}
		Self {
			name: name.to_owned(),
			vocabulary: bigrams.tails(),
			unigrams,
			bigrams,
			followers,
		}
	}

	/// Conditional probability of `second` following `first`.
	pub fn probability(&self, first: &str, second: &str) -> f64 {
		conditional(self.bigrams.count(&[first, second]), self.unigrams.word_count(first))
	}

	/// Words observed at least once as the second element of a bigram.
	pub fn vocabulary(&self) -> &[String] {
		&self.vocabulary
	}

	/// Candidates following `context` that pass the threshold, in table order.
	fn candidates(&self, context: &str, sentence: &[String], input: &GenerationInput<String>) -> Vec<Candidate<usize>> {
		let Some(positions) = self.followers.get(context) else {
			return Vec::new();
		};
		let marginal = self.unigrams.word_count(context);

		positions
			.iter()
			.filter_map(|&index| {
				let ([_, next], count) = self.bigrams.get(index)?;
				if !input.allow_duplicates && sentence.contains(next) {
					return None;
				}
				let probability = conditional(count, marginal);
				(probability >= input.threshold()).then_some(Candidate { item: index, probability, count })
			})
			.collect()
	}
}

impl SentenceGenerator for Bigram {
	type Seed = String;

	fn name(&self) -> &str {
		&self.name
	}

	fn make_input(&self) -> GenerationInput<String> {
		GenerationInput::new(Self::DEFAULT_LENGTH)
	}

	fn generate_words<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput<String>) -> Vec<String> {
		let seed = match input.seed.as_ref().filter(|seed| !seed.is_empty()) {
			Some(seed) => seed.clone(),
			None => match self.vocabulary.choose(rng) {
				Some(word) => word.clone(),
				None => return Vec::new(),
			},
		};

		let mut sentence = vec![seed];
		for _ in 0..input.length {
			let context = &sentence[sentence.len() - 1];
			let candidates = self.candidates(context, &sentence, input);
			let Some(index) = select(rng, &candidates, input.policy) else {
				debug!("{}: no candidate after {:?}, stopping at {} words", self.name, context, sentence.len());
				break;
			};
			if let Some(([_, next], _)) = self.bigrams.get(index) {
				sentence.push(next.clone());
			}
		}
		sentence
	}
}
