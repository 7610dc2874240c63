//! Probability and selection helpers shared by the three generators.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::input::SelectionPolicy;

/// A continuation that survived the candidate filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Candidate<T> {
	/// What the generator appends if this candidate wins (usually a table index).
	pub item: T,
	pub probability: f64,
	/// Raw count of the n-gram, used by the weighted policy.
	pub count: u64,
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
///
/// An unseen context therefore yields probability 0.0 and its candidates
/// are filtered out instead of failing the generation.
pub(crate) fn conditional(numerator: u64, denominator: u64) -> f64 {
	if denominator == 0 {
		return 0.0;
	}
	numerator as f64 / denominator as f64
}

/// Picks one candidate according to `policy`.
///
/// Returns `None` if `candidates` is empty.
pub(crate) fn select<T: Copy, R: Rng + ?Sized>(
	rng: &mut R,
	candidates: &[Candidate<T>],
	policy: SelectionPolicy,
) -> Option<T> {
	match policy {
		SelectionPolicy::FirstOfEqualProbability => first_of_equal_probability(rng, candidates),
		SelectionPolicy::Weighted => weighted(rng, candidates),
	}
}

fn first_of_equal_probability<T: Copy, R: Rng + ?Sized>(
	rng: &mut R,
	candidates: &[Candidate<T>],
) -> Option<T> {
	let drawn = candidates.choose(rng)?.probability;
	// Same float computed from the same counts, exact comparison is intended
	candidates
		.iter()
		.find(|candidate| candidate.probability == drawn)
		.map(|candidate| candidate.item)
}

/// Count-weighted draw using a cumulative subtraction over the candidates.
///
/// Falls back to a uniform draw when every count is zero.
pub(crate) fn weighted<T: Copy, R: Rng + ?Sized>(
	rng: &mut R,
	candidates: &[Candidate<T>],
) -> Option<T> {
	let total: u64 = candidates.iter().map(|candidate| candidate.count).sum();
	if total == 0 {
		return candidates.choose(rng).map(|candidate| candidate.item);
	}

	let mut r = rng.random_range(0..total);
	for candidate in candidates {
		if r < candidate.count {
			return Some(candidate.item);
		}
		r -= candidate.count;
	}

	// Unreachable while `total` is the exact sum of the counts
	candidates.last().map(|candidate| candidate.item)
}

/// Flattens word groups into distinct words, keeping first-seen order.
pub(crate) fn distinct_words<'a, I>(words: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a String>,
{
	let mut seen = HashSet::new();
	words
		.into_iter()
		.filter(|word| seen.insert(word.as_str()))
		.cloned()
		.collect()
}
