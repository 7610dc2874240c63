//! Corpus identifiers and the provider contract the generators load from.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::model::frequency::FrequencyTable;

/// Directory-backed provider (TSV files with a postcard cache).
pub mod file;

/// Named corpora known to the file provider.
///
/// # Variants
/// - `Tnc`: Thai National Corpus, ships unigram, bigram and trigram counts.
/// - `Ttc`: Thai Textbook Corpus, unigram counts only.
/// - `Oscar`: OSCAR web text, unigram counts only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
	Tnc,
	Ttc,
	Oscar,
}

impl Corpus {
	pub const ALL: [Corpus; 3] = [Corpus::Tnc, Corpus::Ttc, Corpus::Oscar];

	pub fn id(&self) -> &'static str {
		match self {
			Corpus::Tnc => "tnc",
			Corpus::Ttc => "ttc",
			Corpus::Oscar => "oscar",
		}
	}

	/// Highest n-gram order this corpus provides.
	pub fn max_order(&self) -> usize {
		match self {
			Corpus::Tnc => 3,
			Corpus::Ttc | Corpus::Oscar => 1,
		}
	}

	/// Fails with [`GenError::UnsupportedCorpus`] when `order` is not provided.
	pub fn ensure_order(&self, order: usize) -> Result<()> {
		if order == 0 || order > self.max_order() {
			return Err(GenError::UnsupportedCorpus { corpus: self.id().to_owned(), order });
		}
		Ok(())
	}
}

impl FromStr for Corpus {
	type Err = GenError;

	fn from_str(s: &str) -> Result<Self> {
		let id = s.trim().to_lowercase();
		Corpus::ALL
			.into_iter()
			.find(|corpus| corpus.id() == id)
			.ok_or_else(|| GenError::UnknownCorpus(s.to_owned()))
	}
}

impl fmt::Display for Corpus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}

/// Source of frequency tables, keyed by an opaque corpus identifier.
///
/// Implementations return [`GenError::UnknownCorpus`] for identifiers they do
/// not know and [`GenError::UnsupportedCorpus`] when the corpus exists but has
/// no table of the requested order.
pub trait CorpusProvider {
	fn load_unigram(&self, corpus: &str) -> Result<FrequencyTable<1>>;
	fn load_bigram(&self, corpus: &str) -> Result<FrequencyTable<2>>;
	fn load_trigram(&self, corpus: &str) -> Result<FrequencyTable<3>>;
}

#[derive(Clone, Debug, Default)]
struct MemoryTables {
	unigram: Option<FrequencyTable<1>>,
	bigram: Option<FrequencyTable<2>>,
	trigram: Option<FrequencyTable<3>>,
}

/// In-memory provider, filled programmatically.
///
/// Any string can be used as a corpus identifier.
#[derive(Clone, Debug, Default)]
pub struct MemoryCorpus {
	corpora: HashMap<String, MemoryTables>,
}

impl MemoryCorpus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_unigram(mut self, corpus: &str, table: FrequencyTable<1>) -> Self {
		self.corpora.entry(corpus.to_owned()).or_default().unigram = Some(table);
		self
	}

	pub fn with_bigram(mut self, corpus: &str, table: FrequencyTable<2>) -> Self {
		self.corpora.entry(corpus.to_owned()).or_default().bigram = Some(table);
		self
	}

	pub fn with_trigram(mut self, corpus: &str, table: FrequencyTable<3>) -> Self {
		self.corpora.entry(corpus.to_owned()).or_default().trigram = Some(table);
		self
	}

	fn tables(&self, corpus: &str) -> Result<&MemoryTables> {
		self.corpora
			.get(corpus)
			.ok_or_else(|| GenError::UnknownCorpus(corpus.to_owned()))
	}
}

fn missing(corpus: &str, order: usize) -> GenError {
	GenError::UnsupportedCorpus { corpus: corpus.to_owned(), order }
}

impl CorpusProvider for MemoryCorpus {
	fn load_unigram(&self, corpus: &str) -> Result<FrequencyTable<1>> {
		self.tables(corpus)?.unigram.clone().ok_or_else(|| missing(corpus, 1))
	}

	fn load_bigram(&self, corpus: &str) -> Result<FrequencyTable<2>> {
		self.tables(corpus)?.bigram.clone().ok_or_else(|| missing(corpus, 2))
	}

	fn load_trigram(&self, corpus: &str) -> Result<FrequencyTable<3>> {
		self.tables(corpus)?.trigram.clone().ok_or_else(|| missing(corpus, 3))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::frequency::table;

	#[test]
	fn corpus_ids_parse_case_insensitively() {
		assert_eq!("TNC".parse::<Corpus>().unwrap(), Corpus::Tnc);
		assert_eq!(" oscar ".parse::<Corpus>().unwrap(), Corpus::Oscar);
		assert!(matches!("wiki".parse::<Corpus>(), Err(GenError::UnknownCorpus(_))));
	}

	#[test]
	fn only_tnc_has_higher_orders() {
		assert!(Corpus::Tnc.ensure_order(3).is_ok());
		assert!(Corpus::Ttc.ensure_order(1).is_ok());
		assert!(matches!(
			Corpus::Ttc.ensure_order(2),
			Err(GenError::UnsupportedCorpus { order: 2, .. })
		));
		assert!(Corpus::Oscar.ensure_order(0).is_err());
	}

	#[test]
	fn memory_corpus_reports_missing_tables() {
		let provider = MemoryCorpus::new().with_unigram("small", table([(["a"], 1)]));
		assert_eq!(provider.load_unigram("small").unwrap().len(), 1);
		assert!(matches!(
			provider.load_bigram("small"),
			Err(GenError::UnsupportedCorpus { order: 2, .. })
		));
		assert!(matches!(provider.load_trigram("other"), Err(GenError::UnknownCorpus(_))));
	}
}
