use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};

use super::{Corpus, CorpusProvider};
use crate::error::{GenError, Result};
use crate::io::{cache_path, is_fresh, list_dirs_with, normalize_folder, read_lines};
use crate::model::frequency::{FrequencyTable, Row};

/// Corpus provider reading tab-separated count files from a data folder.
///
/// Layout:
/// ```text
/// <root>/tnc/unigram.tsv    word<TAB>count
/// <root>/tnc/bigram.tsv     word<TAB>word<TAB>count
/// <root>/tnc/trigram.tsv    word<TAB>word<TAB>word<TAB>count
/// <root>/ttc/unigram.tsv
/// <root>/oscar/unigram.tsv
/// ```
///
/// Blank lines and lines starting with `#` are ignored. After a first parse
/// the rows are serialized with `postcard` into a `.bin` file next to the
/// `.tsv`, which is used for later loads as long as it is not older than
/// the source file.
#[derive(Clone, Debug)]
pub struct FileCorpus {
	root: PathBuf,
	use_cache: bool,
}

impl FileCorpus {
	/// Opens a data folder.
	///
	/// Both `"folder"` and `"folder/"` are accepted.
	///
	/// # Errors
	/// Returns an error if the path is not a directory.
	pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
		let root = normalize_folder(root.as_ref());
		if !root.is_dir() {
			return Err(GenError::InvalidInput(format!(
				"expected a corpus directory, got: {}",
				root.display()
			)));
		}
		Ok(Self { root, use_cache: true })
	}

	/// Disables reading and writing of the `.bin` caches.
	pub fn without_cache(mut self) -> Self {
		self.use_cache = false;
		self
	}

	/// Corpus folders present under the root (those holding a `unigram.tsv`).
	pub fn list_corpora(&self) -> Result<Vec<String>> {
		Ok(list_dirs_with(&self.root, &table_file_name(1))?)
	}

	/// Path of the TSV file holding the `order`-gram table of `corpus`.
	pub fn table_path(&self, corpus: Corpus, order: usize) -> PathBuf {
		self.root.join(corpus.id()).join(table_file_name(order))
	}

	fn load<const N: usize>(&self, corpus: &str) -> Result<FrequencyTable<N>> {
		let corpus: Corpus = corpus.parse()?;
		corpus.ensure_order(N)?;
		let path = self.table_path(corpus, N);
		let cache = cache_path(&path)?;

		let table: FrequencyTable<N> = match self.read_cache(&cache, &path)? {
			Some(rows) => FrequencyTable::from_rows(rows)?,
			None => {
				let table = FrequencyTable::from_rows(parse_file(&path, N)?)?;
				if self.use_cache {
					write_cache(&cache, &table.to_rows())?;
				}
				table
			}
		};
		info!("Loaded {} {}-grams from {}", table.len(), N, path.display());
		Ok(table)
	}

	/// Rows of the cache when it is enabled, fresh and readable.
	fn read_cache(&self, cache: &Path, source: &Path) -> Result<Option<Vec<Row>>> {
		if !self.use_cache || !is_fresh(cache, source) {
			return Ok(None);
		}
		let bytes = fs::read(cache)?;
		match postcard::from_bytes::<Vec<Row>>(&bytes) {
			Ok(rows) => {
				debug!("Using cache {}", cache.display());
				Ok(Some(rows))
			}
			Err(e) => {
				warn!("Ignoring unreadable cache {}: {}", cache.display(), e);
				Ok(None)
			}
		}
	}
}

/// Serializes the table rows next to the source file; write failures only warn.
fn write_cache(cache: &Path, rows: &[Row]) -> Result<()> {
	let bytes = postcard::to_stdvec(rows)?;
	match fs::write(cache, bytes) {
		Ok(()) => info!("Wrote cache {}", cache.display()),
		Err(e) => warn!("Could not write cache {}: {}", cache.display(), e),
	}
	Ok(())
}

impl CorpusProvider for FileCorpus {
	fn load_unigram(&self, corpus: &str) -> Result<FrequencyTable<1>> {
		self.load(corpus)
	}

	fn load_bigram(&self, corpus: &str) -> Result<FrequencyTable<2>> {
		self.load(corpus)
	}

	fn load_trigram(&self, corpus: &str) -> Result<FrequencyTable<3>> {
		self.load(corpus)
	}
}

fn table_file_name(order: usize) -> String {
	let name = match order {
		1 => "unigram",
		2 => "bigram",
		3 => "trigram",
		_ => "ngram",
	};
	format!("{name}.tsv")
}

/// Parses a TSV corpus file, splitting its lines into chunks handled by
/// worker threads.
///
/// # Behavior
/// - Splits input lines into chunks (based on CPU cores * factor).
/// - Spawns one thread per chunk; each sends back `(chunk index, rows)`.
/// - Reassembles the chunks in index order so the result follows the file order.
/// - Returns the error of the earliest failing chunk, if any.
fn parse_file(path: &Path, order: usize) -> Result<Vec<Row>> {
	let lines = read_lines(path)?;
	if lines.is_empty() {
		return Ok(Vec::new());
	}

	let cpus = num_cpus::get();
	let factor = 8;
	let chunks = cpus * factor;
	let chunk_size = lines.len().div_ceil(chunks);

	let (tx, rx) = mpsc::channel();
	for (index, chunk) in lines.chunks(chunk_size).enumerate() {
		let tx = tx.clone();
		let chunk: Vec<String> = chunk.to_vec();
		let path = path.to_path_buf();
		let first_line = index * chunk_size + 1;

		thread::spawn(move || {
			let parsed = parse_chunk(&chunk, order, first_line)
				.map_err(|(line, reason)| GenError::Parse { path, line, reason });
			// The receiver outlives every sender
			let _ = tx.send((index, parsed));
		});
	}
	drop(tx);

	let mut parts: Vec<(usize, Result<Vec<Row>>)> = rx.iter().collect();
	parts.sort_by_key(|(index, _)| *index);

	let mut rows = Vec::with_capacity(lines.len());
	for (_, part) in parts {
		rows.extend(part?);
	}
	Ok(rows)
}

/// Parses consecutive lines; errors carry the 1-based line number.
fn parse_chunk(
	lines: &[String],
	order: usize,
	first_line: usize,
) -> std::result::Result<Vec<Row>, (usize, String)> {
	let mut rows = Vec::with_capacity(lines.len());
	for (offset, line) in lines.iter().enumerate() {
		match parse_line(line, order) {
			Ok(Some(row)) => rows.push(row),
			Ok(None) => (),
			Err(reason) => return Err((first_line + offset, reason)),
		}
	}
	Ok(rows)
}

/// Parses `w1<TAB>...<TAB>wN<TAB>count`.
///
/// Returns `Ok(None)` for blank and comment lines.
fn parse_line(line: &str, order: usize) -> std::result::Result<Option<Row>, String> {
	let line = line.trim_end_matches(['\r', '\n']);
	if line.trim().is_empty() || line.starts_with('#') {
		return Ok(None);
	}

	let fields: Vec<&str> = line.split('\t').collect();
	if fields.len() != order + 1 {
		return Err(format!("expected {} tab-separated fields, found {}", order + 1, fields.len()));
	}

	let (words, count) = fields.split_at(order);
	let count: u64 = count[0]
		.trim()
		.parse()
		.map_err(|_| format!("invalid count {:?}", count[0]))?;
	if let Some(word) = words.iter().find(|word| word.is_empty()) {
		return Err(format!("empty word {word:?}"));
	}

	Ok(Some((words.iter().map(|word| (*word).to_owned()).collect(), count)))
}
