//! Top-level module for the word n-gram sentence generators.
//!
//! This module provides:
//! - Word frequency tables (`FrequencyTable`)
//! - Unigram, bigram and trigram generators (`Unigram`, `Bigram`, `Trigram`)
//! - Generation parameters and output shaping (`GenerationInput`, `Output`)
//! - A per-corpus bundle of generators (`CorpusModels`)

/// Insertion-ordered n-gram count tables.
pub mod frequency;

/// Shared generator trait and per-corpus model bundle.
pub mod generator;

/// Generation parameters, selection policies and output shapes.
pub mod input;

/// Generator drawing words independently from the unigram distribution.
pub mod unigram;

/// Generator conditioned on the previous word.
pub mod bigram;

/// Generator conditioned on the previous two words.
pub mod trigram;

/// Conditional probability, candidate selection and word deduplication.
///
/// Not exposed
mod selection;

pub use bigram::Bigram;
pub use frequency::FrequencyTable;
pub use generator::{CorpusModels, ModelKind, SentenceGenerator};
pub use input::{DEFAULT_THRESHOLD, GenerationInput, Output, SelectionPolicy};
pub use trigram::{Context, Trigram};
pub use unigram::Unigram;
