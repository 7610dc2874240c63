use std::collections::{HashMap, HashSet};

use crate::error::{GenError, Result};

/// Raw row of a frequency table: the n-gram words followed by their count.
///
/// This is the shape used on disk (TSV lines and the postcard cache).
pub type Row = (Vec<String>, u64);

/// Immutable-after-load mapping from an n-gram (`[String; N]`) to its count.
///
/// The table keeps the order in which n-grams were first inserted. That order
/// is the iteration order of every derived view (vocabulary, candidate sets),
/// which keeps generation reproducible for a fixed random stream.
///
/// # Responsibilities
/// - Accumulate counts (repeated keys are summed)
/// - Answer count lookups and the grand total
///
/// # Invariants
/// - Each key appears exactly once in `entries`
/// - `positions[key]` is the index of `key` in `entries`
/// - `total` is the (saturating) sum of all counts
#[derive(Clone, Debug, Default)]
pub struct FrequencyTable<const N: usize> {
	entries: Vec<([String; N], u64)>,
	positions: HashMap<[String; N], usize>,
	total: u64,
}

impl<const N: usize> FrequencyTable<N> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self { entries: Vec::new(), positions: HashMap::new(), total: 0 }
	}

	/// Records `count` more occurrences of `gram`.
	pub fn add(&mut self, gram: [String; N], count: u64) {
		self.total = self.total.saturating_add(count);
		match self.positions.get(&gram) {
			Some(&index) => {
				let slot = &mut self.entries[index].1;
				*slot = slot.saturating_add(count);
			}
			None => {
				self.positions.insert(gram.clone(), self.entries.len());
				self.entries.push((gram, count));
			}
		}
	}

	/// Builds a table from on-disk rows.
	///
	/// # Errors
	/// Returns [`GenError::Arity`] if a row does not hold exactly `N` words.
	pub fn from_rows<I: IntoIterator<Item = Row>>(rows: I) -> Result<Self> {
		let mut table = Self::new();
		for (words, count) in rows {
			let found = words.len();
			let gram: [String; N] = words
				.try_into()
				.map_err(|_| GenError::Arity { expected: N, found })?;
			table.add(gram, count);
		}
		Ok(table)
	}

	/// Returns the table as rows, in table order.
	pub fn to_rows(&self) -> Vec<Row> {
		self.entries
			.iter()
			.map(|(gram, count)| (gram.to_vec(), *count))
			.collect()
	}

	/// Count of `gram`, or 0 when it was never observed.
	pub fn count(&self, gram: &[&str; N]) -> u64 {
		let key: [String; N] = (*gram).map(|word| word.to_owned());
		self.count_of(&key)
	}

	/// Same as [`count`](Self::count) for an owned key.
	pub fn count_of(&self, gram: &[String; N]) -> u64 {
		self.positions
			.get(gram)
			.map(|&index| self.entries[index].1)
			.unwrap_or(0)
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.total
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entry at `index` in table order.
	pub fn get(&self, index: usize) -> Option<(&[String; N], u64)> {
		self.entries.get(index).map(|(gram, count)| (gram, *count))
	}

	/// All entries in table order.
	pub fn entries(&self) -> &[([String; N], u64)] {
		&self.entries
	}

	pub fn iter(&self) -> impl Iterator<Item = (&[String; N], u64)> {
		self.entries.iter().map(|(gram, count)| (gram, *count))
	}

	/// Distinct last words of every key, in first-seen order.
	///
	/// For a bigram table this is the set of words observed at least once
	/// as a "next word".
	pub fn tails(&self) -> Vec<String> {
		let mut seen = HashSet::new();
		self.entries
			.iter()
			.filter_map(|(gram, _)| gram.last())
			.filter(|word| seen.insert(word.as_str()))
			.cloned()
			.collect()
	}
}

impl FrequencyTable<1> {
	/// Count of a single word.
	pub fn word_count(&self, word: &str) -> u64 {
		self.count(&[word])
	}
}

impl<const N: usize> FromIterator<([String; N], u64)> for FrequencyTable<N> {
	fn from_iter<I: IntoIterator<Item = ([String; N], u64)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (gram, count) in iter {
			table.add(gram, count);
		}
		table
	}
}

/// Builds a table from borrowed word tuples, mostly useful in tests and demos.
///
/// ```
/// use rs_wordgen_core::model::frequency::{table, FrequencyTable};
///
/// let bigrams: FrequencyTable<2> = table([(["a", "b"], 2), (["b", "c"], 1)]);
/// assert_eq!(bigrams.count(&["a", "b"]), 2);
/// ```
pub fn table<'a, const N: usize, I>(grams: I) -> FrequencyTable<N>
where
	I: IntoIterator<Item = ([&'a str; N], u64)>,
{
	grams
		.into_iter()
		.map(|(gram, count)| (gram.map(str::to_owned), count))
		.collect()
}
