//! Error type shared by the corpus providers and the generators.
//!
//! Generation itself never fails: every error below is raised while
//! resolving a corpus, reading its tables or validating caller input.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Error, Debug)]
pub enum GenError {
	/// The corpus identifier is not known to the provider.
	#[error("unknown corpus: {0}")]
	UnknownCorpus(String),

	/// The corpus exists but does not ship a table of the requested order.
	#[error("corpus {corpus} has no {order}-gram table")]
	UnsupportedCorpus { corpus: String, order: usize },

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// A corpus file line could not be read as `word<TAB>...<TAB>count`.
	#[error("{}:{line}: {reason}", .path.display())]
	Parse { path: PathBuf, line: usize, reason: String },

	/// A row does not hold the number of words the table expects.
	#[error("expected {expected} words per n-gram, found {found}")]
	Arity { expected: usize, found: usize },

	#[error("cache error: {0}")]
	Cache(#[from] postcard::Error),

	#[error("invalid input: {0}")]
	InvalidInput(String),
}
