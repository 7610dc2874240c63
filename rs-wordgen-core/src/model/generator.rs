use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

use super::bigram::Bigram;
use super::input::{GenerationInput, Output};
use super::trigram::Trigram;
use super::unigram::Unigram;
use crate::corpus::CorpusProvider;
use crate::error::{GenError, Result};

/// Common entry point of the unigram, bigram and trigram generators.
///
/// Generators are read-only after construction: every call keeps its state
/// (emitted words, current context) in local variables, so one instance can
/// be shared between callers.
pub trait SentenceGenerator {
	/// Starting point accepted in [`GenerationInput::seed`].
	type Seed;

	/// Name of the corpus the generator was built from.
	fn name(&self) -> &str;

	/// Input pre-filled with this generator's default length.
	fn make_input(&self) -> GenerationInput<Self::Seed>;

	/// Generates the ordered list of words, seed included.
	///
	/// Never fails: an empty candidate set simply ends the sentence early.
	fn generate_words<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput<Self::Seed>) -> Vec<String>;

	/// Generates a sentence shaped by `input.as_text`.
	fn generate<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput<Self::Seed>) -> Output {
		let words = self.generate_words(rng, input);
		debug!("{}: generated {} words", self.name(), words.len());
		Output::new(words, input.as_text)
	}

	/// Same as [`generate`](Self::generate) with the thread-local RNG.
	fn generate_default(&self, input: &GenerationInput<Self::Seed>) -> Output {
		self.generate(&mut rand::rng(), input)
	}
}

/// Order of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
	Unigram,
	Bigram,
	Trigram,
}

impl ModelKind {
	pub fn order(&self) -> usize {
		match self {
			ModelKind::Unigram => 1,
			ModelKind::Bigram => 2,
			ModelKind::Trigram => 3,
		}
	}
}

/// Every generator a corpus supports, built from a single load of its tables.
///
/// # Responsibilities
/// - Load each table of a corpus once and share it between generators
/// - Skip the orders the corpus does not provide
/// - Give typed access to each generator
#[derive(Clone, Debug)]
pub struct CorpusModels {
	name: String,
	unigram: Unigram,
	bigram: Option<Bigram>,
	trigram: Option<Trigram>,
}

impl CorpusModels {
	/// Loads all generators available for `corpus`.
	///
	/// # Errors
	/// - Returns an error if the corpus has no unigram table.
	/// - Propagates provider errors other than a missing higher-order table.
	pub fn load<P: CorpusProvider + ?Sized>(provider: &P, corpus: &str) -> Result<Self> {
		let unigrams = Arc::new(provider.load_unigram(corpus)?);
		let unigram = Unigram::from_table(corpus, unigrams.clone());

		let bigrams = optional(provider.load_bigram(corpus))?.map(Arc::new);
		let trigrams = match bigrams {
			Some(_) => optional(provider.load_trigram(corpus))?.map(Arc::new),
			None => None,
		};

		let bigram = bigrams
			.as_ref()
			.map(|bigrams| Bigram::from_tables(corpus, unigrams.clone(), bigrams.clone()));
		let trigram = match (&bigrams, trigrams) {
			(Some(bigrams), Some(trigrams)) => {
				Some(Trigram::from_tables(corpus, bigrams.clone(), trigrams))
			}
			_ => None,
		};

		info!(
			"Corpus {} ready (bigram: {}, trigram: {})",
			corpus,
			bigram.is_some(),
			trigram.is_some()
		);
		Ok(Self { name: corpus.to_owned(), unigram, bigram, trigram })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Kinds of generator available for this corpus.
	pub fn kinds(&self) -> Vec<ModelKind> {
		let mut kinds = vec![ModelKind::Unigram];
		if self.bigram.is_some() {
			kinds.push(ModelKind::Bigram);
		}
		if self.trigram.is_some() {
			kinds.push(ModelKind::Trigram);
		}
		kinds
	}

	pub fn unigram(&self) -> &Unigram {
		&self.unigram
	}

	/// # Errors
	/// Returns [`GenError::UnsupportedCorpus`] if the corpus has no bigram table.
	pub fn bigram(&self) -> Result<&Bigram> {
		self.bigram.as_ref().ok_or_else(|| self.unsupported(ModelKind::Bigram))
	}

	/// # Errors
	/// Returns [`GenError::UnsupportedCorpus`] if the corpus has no trigram table.
	pub fn trigram(&self) -> Result<&Trigram> {
		self.trigram.as_ref().ok_or_else(|| self.unsupported(ModelKind::Trigram))
	}

	fn unsupported(&self, kind: ModelKind) -> GenError {
		GenError::UnsupportedCorpus { corpus: self.name.clone(), order: kind.order() }
	}
}

/// Turns a missing higher-order table into `None`.
fn optional<T>(loaded: Result<T>) -> Result<Option<T>> {
	match loaded {
		Ok(table) => Ok(Some(table)),
		Err(GenError::UnsupportedCorpus { .. }) => Ok(None),
		Err(e) => Err(e),
	}
}
