//! Word n-gram sentence generation library.
//!
//! This crate provides:
//! - Unigram, bigram and trigram sentence generators over word-frequency corpora
//! - A threshold filter and a no-repeat policy applied at every step
//! - Injected randomness, so any seeded `rand::Rng` gives reproducible output
//! - Corpus providers (in-memory and TSV folders with a binary cache)
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_wordgen_core::corpus::MemoryCorpus;
//! use rs_wordgen_core::model::frequency::table;
//! use rs_wordgen_core::model::{Bigram, SentenceGenerator};
//!
//! let provider = MemoryCorpus::new()
//!     .with_unigram("tnc", table([(["แมว"], 2), (["กิน"], 2), (["ปลา"], 1)]))
//!     .with_bigram("tnc", table([(["แมว", "กิน"], 2), (["กิน", "ปลา"], 1)]));
//! let bigram = Bigram::new(&provider, "tnc")?;
//!
//! let input = bigram.make_input().with_seed("แมว".to_owned());
//! let sentence = bigram.generate(&mut StdRng::seed_from_u64(1), &input);
//! assert_eq!(sentence.to_string(), "แมวกินปลา");
//! # Ok::<(), rs_wordgen_core::error::GenError>(())
//! ```

/// Sentence generators and the tables they read.
pub mod model;

/// Corpus identifiers and providers.
pub mod corpus;

/// Crate error type.
pub mod error;

/// I/O utilities (file loading, cache paths).
///
/// Not exposed
pub(crate) mod io;

pub use error::{GenError, Result};
