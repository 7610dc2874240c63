use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a corpus file and returns its lines.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Strips a leading UTF-8 byte order mark
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Path of the binary cache stored next to a corpus file.
///
/// Example:
/// `data/tnc/bigram.tsv` → `data/tnc/bigram.bin`
pub(crate) fn cache_path<P: AsRef<Path>>(input_path: P) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension("bin");

	Ok(output)
}

/// True when `cache` exists and was modified no earlier than `source`.
///
/// Any metadata error counts as stale.
pub(crate) fn is_fresh<P: AsRef<Path>, Q: AsRef<Path>>(cache: P, source: Q) -> bool {
	let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified());
	match (modified(cache.as_ref()), modified(source.as_ref())) {
		(Ok(cache_time), Ok(source_time)) => cache_time >= source_time,
		_ => false,
	}
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists the sub-directories of `dir` that contain a file named `marker`.
///
/// Returns directory names only (no paths), sorted.
pub(crate) fn list_dirs_with<P: AsRef<Path>>(dir: P, marker: &str) -> io::Result<Vec<String>> {
	let mut dirs = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_dir() && path.join(marker).is_file() {
			if let Some(name) = path.file_name() {
				dirs.push(name.to_string_lossy().to_string());
			}
		}
	}

	dirs.sort();
	Ok(dirs)
}
