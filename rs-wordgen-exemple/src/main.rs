use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_wordgen_core::corpus::MemoryCorpus;
use rs_wordgen_core::corpus::file::FileCorpus;
use rs_wordgen_core::model::frequency::table;
use rs_wordgen_core::model::{CorpusModels, SelectionPolicy, SentenceGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Use the "data" directory (tnc/unigram.tsv, ...) when present,
    // otherwise fall back to a tiny in-memory corpus
    let models = match FileCorpus::new("./data") {
        Ok(provider) => CorpusModels::load(&provider, "tnc")?,
        Err(_) => {
            log::info!("No ./data directory, using the built-in sample corpus");
            CorpusModels::load(&sample_corpus(), "tnc")?
        }
    };

    // Every call takes its random source, seeding it makes the output reproducible
    let mut rng = StdRng::seed_from_u64(2024);

    // Unigram: words drawn independently, seed lowercased
    let unigram = models.unigram();
    let mut input = unigram.make_input();
    input.seed = Some("แมว".to_owned());
    input.set_threshold(0.05)?;
    println!("unigram: {}", unigram.generate(&mut rng, &input));

    // Thresholds must be finite and >= 0.0
    match input.set_threshold(-1.0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Threshold -1.0 is invalid: {e}"),
    }

    // Bigram: each word conditioned on the previous one
    let bigram = models.bigram()?;
    let input = bigram.make_input().with_seed("แมว".to_owned()).with_text(false);
    println!("bigram (words): {}", bigram.generate(&mut rng, &input));

    // Weighted sampling instead of the historical first-of-equal-probability draw
    let input = input.with_text(true).with_policy(SelectionPolicy::Weighted);
    println!("bigram (weighted): {}", bigram.generate(&mut rng, &input));

    // Trigram: seeded with a two-word context, or random when absent
    let trigram = models.trigram()?;
    let input = trigram.make_input().with_seed(["แมว".to_owned(), "กิน".to_owned()]);
    println!("trigram: {}", trigram.generate(&mut rng, &input));
    for i in 0..5 {
        println!("trigram random {}: {}", i + 1, trigram.generate_default(&trigram.make_input()));
    }

    // Same seed, same sentence
    let input = bigram.make_input();
    let first = bigram.generate(&mut StdRng::seed_from_u64(7), &input);
    let second = bigram.generate(&mut StdRng::seed_from_u64(7), &input);
    println!("reproducible: {} == {} -> {}", first, second, first == second);

    Ok(())
}

fn sample_corpus() -> MemoryCorpus {
    MemoryCorpus::new()
        .with_unigram(
            "tnc",
            table([(["แมว"], 12), (["กิน"], 20), (["ปลา"], 9), (["ข้าว"], 15), (["นอน"], 6), (["บน"], 5), (["เตียง"], 3)]),
        )
        .with_bigram(
            "tnc",
            table([
                (["แมว", "กิน"], 6),
                (["แมว", "นอน"], 3),
                (["กิน", "ปลา"], 5),
                (["กิน", "ข้าว"], 8),
                (["นอน", "บน"], 4),
                (["บน", "เตียง"], 3),
                (["ปลา", "แมว"], 1),
                (["ข้าว", "แมว"], 1),
            ]),
        )
        .with_trigram(
            "tnc",
            table([
                (["แมว", "กิน", "ปลา"], 4),
                (["แมว", "กิน", "ข้าว"], 2),
                (["แมว", "นอน", "บน"], 2),
                (["นอน", "บน", "เตียง"], 3),
                (["กิน", "ปลา", "แมว"], 1),
                (["ปลา", "แมว", "นอน"], 1),
            ]),
        )
}
