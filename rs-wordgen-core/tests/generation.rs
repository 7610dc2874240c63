use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_wordgen_core::corpus::file::FileCorpus;
use rs_wordgen_core::corpus::{CorpusProvider, MemoryCorpus};
use rs_wordgen_core::model::frequency::table;
use rs_wordgen_core::model::{
	Bigram, CorpusModels, GenerationInput, Output, SelectionPolicy, SentenceGenerator, Trigram, Unigram,
};
use rs_wordgen_core::GenError;

fn provider() -> MemoryCorpus {
	MemoryCorpus::new()
		.with_unigram(
			"tnc",
			table([(["ฉัน"], 8), (["กิน"], 6), (["ข้าว"], 5), (["ปลา"], 3), (["แล้ว"], 2), (["ไป"], 4)]),
		)
		.with_bigram(
			"tnc",
			table([
				(["ฉัน", "กิน"], 4),
				(["ฉัน", "ไป"], 3),
				(["กิน", "ข้าว"], 4),
				(["กิน", "ปลา"], 2),
				(["ข้าว", "แล้ว"], 1),
				(["ปลา", "แล้ว"], 1),
				(["ไป", "กิน"], 2),
				(["แล้ว", "ไป"], 1),
			]),
		)
		.with_trigram(
			"tnc",
			table([
				(["ฉัน", "กิน", "ข้าว"], 3),
				(["ฉัน", "กิน", "ปลา"], 1),
				(["กิน", "ข้าว", "แล้ว"], 1),
				(["ข้าว", "แล้ว", "ไป"], 1),
				(["ไป", "กิน", "ข้าว"], 2),
				(["ฉัน", "ไป", "กิน"], 2),
			]),
		)
}

fn word_input(seed: Option<&str>, length: usize) -> GenerationInput<String> {
	let mut input = GenerationInput::new(length).with_text(false);
	input.seed = seed.map(str::to_owned);
	input
}

fn words(output: Output) -> Vec<String> {
	assert!(output.as_words().is_some(), "expected words, got {output:?}");
	output.into_words()
}

#[test]
fn unigram_seed_then_only_other_word() {
	let provider = MemoryCorpus::new().with_unigram("small", table([(["a"], 3), (["b"], 1)]));
	let unigram = Unigram::new(&provider, "small").unwrap();
	let input = word_input(Some("a"), 1).with_threshold(0.0).unwrap();
	for seed in 0..10 {
		let out = words(unigram.generate(&mut StdRng::seed_from_u64(seed), &input));
		assert_eq!(out, vec!["a", "b"]);
	}
}

#[test]
fn bigram_unknown_context_returns_seed() {
	let bigram = Bigram::new(&provider(), "tnc").unwrap();
	let out = bigram.generate(&mut StdRng::seed_from_u64(0), &word_input(Some("x"), 3));
	assert_eq!(words(out), vec!["x"]);
}

#[test]
fn threshold_above_one_keeps_only_seed() {
	let models = CorpusModels::load(&provider(), "tnc").unwrap();
	let mut rng = StdRng::seed_from_u64(3);

	let input = word_input(Some("ฉัน"), 4).with_threshold(1.1).unwrap();
	assert_eq!(words(models.bigram().unwrap().generate(&mut rng, &input)), vec!["ฉัน"]);

	let input = GenerationInput::new(4)
		.with_seed(["ฉัน".to_owned(), "กิน".to_owned()])
		.with_threshold(1.1)
		.unwrap()
		.with_text(false);
	assert_eq!(words(models.trigram().unwrap().generate(&mut rng, &input)), vec!["ฉัน", "กิน"]);
}

#[test]
fn zero_length_returns_seed_for_every_generator() {
	let models = CorpusModels::load(&provider(), "tnc").unwrap();
	let mut rng = StdRng::seed_from_u64(8);
	assert_eq!(models.unigram().generate_words(&mut rng, &word_input(Some("ไป"), 0)), vec!["ไป"]);
	assert_eq!(models.bigram().unwrap().generate_words(&mut rng, &word_input(Some("ไป"), 0)), vec!["ไป"]);
	let input = GenerationInput::new(0).with_seed(["ไป".to_owned(), "กิน".to_owned()]);
	assert_eq!(models.trigram().unwrap().generate_words(&mut rng, &input), vec!["ไป", "กิน"]);
}

#[test]
fn text_output_is_concatenated_word_output() {
	let trigram = Trigram::new(&provider(), "tnc").unwrap();
	for seed in 0..20 {
		let list = trigram.generate(&mut StdRng::seed_from_u64(seed), &trigram.make_input().with_text(false));
		let text = trigram.generate(&mut StdRng::seed_from_u64(seed), &trigram.make_input());
		assert_eq!(text, Output::Text(words(list).concat()));
	}
}

#[test]
fn same_rng_seed_same_sentence() {
	let models = CorpusModels::load(&provider(), "tnc").unwrap();
	for policy in [SelectionPolicy::FirstOfEqualProbability, SelectionPolicy::Weighted] {
		let input = word_input(None, 5).with_policy(policy).with_threshold(0.0).unwrap();
		let first = models.bigram().unwrap().generate(&mut StdRng::seed_from_u64(42), &input);
		let second = models.bigram().unwrap().generate(&mut StdRng::seed_from_u64(42), &input);
		assert_eq!(first, second);

		let first = models.unigram().generate(&mut StdRng::seed_from_u64(42), &input);
		let second = models.unigram().generate(&mut StdRng::seed_from_u64(42), &input);
		assert_eq!(first, second);
	}
}

#[test]
fn length_bound_and_no_duplicates() {
	let models = CorpusModels::load(&provider(), "tnc").unwrap();
	for seed in 0..100 {
		let mut rng = StdRng::seed_from_u64(seed);
		for length in 0..6 {
			let input = word_input(None, length).with_threshold(0.0).unwrap();
			for out in [
				models.unigram().generate_words(&mut rng, &input),
				models.bigram().unwrap().generate_words(&mut rng, &input),
			] {
				assert!(out.len() <= length + 1);
				assert_distinct(&out);
			}

			let input = GenerationInput::new(length).with_threshold(0.0).unwrap();
			let out = models.trigram().unwrap().generate_words(&mut rng, &input);
			assert!(out.len() <= length + 2);
			assert_distinct(&out);
		}
	}
}

fn assert_distinct(words: &[String]) {
	let mut sorted = words.to_vec();
	sorted.sort();
	sorted.dedup();
	assert_eq!(sorted.len(), words.len(), "duplicate in {words:?}");
}

#[test]
fn higher_threshold_never_extends_a_chain() {
	// Each context has a single follower with a decreasing probability.
	let provider = MemoryCorpus::new()
		.with_unigram("chain", table([(["a"], 1), (["b"], 2), (["c"], 4), (["d"], 8)]))
		.with_bigram("chain", table([(["a", "b"], 1), (["b", "c"], 1), (["c", "d"], 1)]));
	let bigram = Bigram::new(&provider, "chain").unwrap();

	let mut previous = usize::MAX;
	for threshold in [0.0, 0.1, 0.2, 0.3, 0.6, 1.0, 1.5] {
		let input = word_input(Some("a"), 10).with_threshold(threshold).unwrap();
		let len = bigram.generate_words(&mut StdRng::seed_from_u64(0), &input).len();
		assert!(len <= previous, "threshold {threshold} produced {len} words");
		previous = len;
	}
	assert_eq!(previous, 1);
}

#[test]
fn unsupported_orders_fail_at_construction() {
	let provider = MemoryCorpus::new().with_unigram("ttc", table([(["a"], 1)]));
	assert!(matches!(Bigram::new(&provider, "ttc"), Err(GenError::UnsupportedCorpus { .. })));
	assert!(matches!(Trigram::new(&provider, "ttc"), Err(GenError::UnsupportedCorpus { .. })));
	assert!(matches!(Unigram::new(&provider, "nope"), Err(GenError::UnknownCorpus(_))));
}

#[test]
fn file_corpus_end_to_end() {
	let root = std::env::temp_dir().join(format!("rs-wordgen-it-{}", std::process::id()));
	let _ = fs::remove_dir_all(&root);
	fs::create_dir_all(root.join("tnc")).unwrap();
	fs::write(root.join("tnc/unigram.tsv"), "# word\tcount\nแมว\t2\nกิน\t2\nปลา\t1\n").unwrap();
	fs::write(root.join("tnc/bigram.tsv"), "แมว\tกิน\t2\nกิน\tปลา\t1\n").unwrap();
	fs::write(root.join("tnc/trigram.tsv"), "แมว\tกิน\tปลา\t1\n").unwrap();

	let provider = FileCorpus::new(&root).unwrap();
	assert_eq!(provider.load_unigram("tnc").unwrap().total(), 5);

	let models = CorpusModels::load(&provider, "tnc").unwrap();
	let input = GenerationInput::new(4).with_seed(["แมว".to_owned(), "กิน".to_owned()]);
	let out = models.trigram().unwrap().generate(&mut StdRng::seed_from_u64(0), &input);
	assert_eq!(out.to_string(), "แมวกินปลา");

	let _ = fs::remove_dir_all(&root);
}
