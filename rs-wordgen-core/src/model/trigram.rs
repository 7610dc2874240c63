use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::frequency::FrequencyTable;
use super::generator::SentenceGenerator;
use super::input::GenerationInput;
use super::selection::{Candidate, conditional, distinct_words, select};
use crate::corpus::CorpusProvider;
use crate::error::Result;

/// Two-word context used to seed and drive the trigram generator.
pub type Context = [String; 2];

/// Generator conditioning each word on the two previous ones.
///
/// `P(w3 | w1, w2) = count(w1, w2, w3) / count(w1, w2)`, 0.0 on a zero or
/// missing denominator.
///
/// Generation appends two-word contexts rather than single words; the
/// returned sentence is the flattened contexts with repeated words removed.
#[derive(Clone, Debug)]
pub struct Trigram {
	name: String,
	bigrams: Arc<FrequencyTable<2>>,
	trigrams: Arc<FrequencyTable<3>>,
	vocabulary: Vec<String>,
	followers: HashMap<Context, Vec<usize>>,
}

impl Trigram {
	pub const DEFAULT_LENGTH: usize = 4;

	/// Loads the unigram, bigram and trigram tables of `corpus`.
	///
	/// # Errors
	/// Returns the provider's error for unknown or unsupported corpora.
	pub fn new<P: CorpusProvider + ?Sized>(provider: &P, corpus: &str) -> Result<Self> {
		// A corpus without unigrams is rejected like for the other generators
		provider.load_unigram(corpus)?;
		let bigrams = provider.load_bigram(corpus)?;
		let trigrams = provider.load_trigram(corpus)?;
		Ok(Self::from_tables(corpus, Arc::new(bigrams), Arc::new(trigrams)))
	}

	pub fn from_tables(
		name: &str,
		bigrams: Arc<FrequencyTable<2>>,
		trigrams: Arc<FrequencyTable<3>>,
	) -> Self {
		let mut followers: HashMap<Context, Vec<usize>> = HashMap::new();
		for (index, ([first, second, _], _)) in trigrams.iter().enumerate() {
			followers
				.entry([first.clone(), second.clone()])
				.or_default()
				.push(index);
		}
		Self {
			name: name.to_owned(),
			vocabulary: bigrams.tails(),
			bigrams,
			trigrams,
			followers,
		}
	}

	/// Conditional probability of `third` following `first second`.
	pub fn probability(&self, first: &str, second: &str, third: &str) -> f64 {
		conditional(
			self.trigrams.count(&[first, second, third]),
			self.bigrams.count(&[first, second]),
		)
	}

	/// Words observed at least once as the second element of a bigram.
	pub fn vocabulary(&self) -> &[String] {
		&self.vocabulary
	}

	/// Candidates extending `context` that pass the threshold, in table order.
	///
	/// Without duplicates, a trigram is skipped when its trailing pair was
	/// already appended as a context.
	fn candidates(&self, context: &Context, contexts: &[Context], input: &GenerationInput<Context>) -> Vec<Candidate<usize>> {
		let Some(positions) = self.followers.get(context) else {
			return Vec::new();
		};
		let marginal = self.bigrams.count_of(context);

		positions
			.iter()
			.filter_map(|&index| {
				let ([_, second, third], count) = self.trigrams.get(index)?;
				if !input.allow_duplicates
					&& contexts.iter().any(|[a, b]| a == second && b == third)
				{
					return None;
				}
				let probability = conditional(count, marginal);
				(probability >= input.threshold()).then_some(Candidate { item: index, probability, count })
			})
			.collect()
	}
}

impl SentenceGenerator for Trigram {
	type Seed = Context;

	fn name(&self) -> &str {
		&self.name
	}

	fn make_input(&self) -> GenerationInput<Context> {
		GenerationInput::new(Self::DEFAULT_LENGTH)
	}

	fn generate_words<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput<Context>) -> Vec<String> {
		let seed = match input.seed.as_ref().filter(|seed| seed.iter().all(|word| !word.is_empty())) {
			Some(seed) => seed.clone(),
			None => match self.bigrams.entries().choose(rng) {
				Some((gram, _)) => gram.clone(),
				None => return Vec::new(),
			},
		};

		let mut contexts: Vec<Context> = vec![seed];
		for _ in 0..input.length {
			let context = &contexts[contexts.len() - 1];
			let candidates = self.candidates(context, &contexts, input);
			let Some(index) = select(rng, &candidates, input.policy) else {
				debug!("{}: no candidate after {:?}, stopping at {} contexts", self.name, context, contexts.len());
				break;
			};
			if let Some(([_, second, third], _)) = self.trigrams.get(index) {
				contexts.push([second.clone(), third.clone()]);
			}
		}

		distinct_words(contexts.iter().flatten())
	}
}
