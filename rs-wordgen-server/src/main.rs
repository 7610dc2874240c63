use std::collections::HashMap;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_wordgen_core::corpus::file::FileCorpus;
use rs_wordgen_core::model::{
	Context, CorpusModels, GenerationInput, ModelKind, Output, SelectionPolicy, SentenceGenerator,
};
use rs_wordgen_core::GenError;

mod config;

use crate::config::ServerConfig;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	corpus: Option<String>,
	model: Option<ModelKind>,
	seed: Option<String>, // word, or "w1,w2" for trigrams
	length: Option<usize>,
	threshold: Option<f64>,
	output: Option<String>, // "text" (default) or "words"
	duplicate: Option<bool>,
	policy: Option<SelectionPolicy>,
	rng_seed: Option<u64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

struct SharedData {
	provider: Option<FileCorpus>,
	models: HashMap<String, CorpusModels>,
}

impl GenerateParams {
	fn as_text(&self) -> Result<bool, String> {
		match self.output.as_deref().map(str::to_lowercase).as_deref() {
			None | Some("text") => Ok(true),
			Some("words") => Ok(false),
			Some(other) => Err(format!("Output must be 'text' or 'words', got '{other}'")),
		}
	}

	/// Builds the generation input for a generator, applying the query overrides.
	fn input<S>(&self, mut input: GenerationInput<S>, seed: Option<S>) -> Result<GenerationInput<S>, String> {
		input.seed = seed;
		if let Some(length) = self.length {
			input.length = length;
		}
		if let Some(threshold) = self.threshold {
			input.set_threshold(threshold).map_err(|e| e.to_string())?;
		}
		input.as_text = self.as_text()?;
		input.allow_duplicates = self.duplicate.unwrap_or(false);
		input.policy = self.policy.unwrap_or_default();
		Ok(input)
	}

	/// Trigram seed: exactly two words separated by a comma.
	fn context_seed(&self) -> Result<Option<Context>, String> {
		let Some(seed) = &self.seed else {
			return Ok(None);
		};
		let parts: Vec<&str> = seed.split(',').map(str::trim).collect();
		match parts.as_slice() {
			[first, second] => Ok(Some([(*first).to_owned(), (*second).to_owned()])),
			_ => Err(format!("Trigram seed must be two words separated by ',', got '{seed}'")),
		}
	}

	fn generate(&self, models: &CorpusModels) -> Result<Output, String> {
		let mut rng = match self.rng_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		let unsupported = |e: GenError| e.to_string();

		match self.model.unwrap_or(ModelKind::Unigram) {
			ModelKind::Unigram => {
				let generator = models.unigram();
				let input = self.input(generator.make_input(), self.seed.clone())?;
				Ok(generator.generate(&mut rng, &input))
			}
			ModelKind::Bigram => {
				let generator = models.bigram().map_err(unsupported)?;
				let input = self.input(generator.make_input(), self.seed.clone())?;
				Ok(generator.generate(&mut rng, &input))
			}
			ModelKind::Trigram => {
				let generator = models.trigram().map_err(unsupported)?;
				let input = self.input(generator.make_input(), self.context_seed()?)?;
				Ok(generator.generate(&mut rng, &input))
			}
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a sentence from a loaded corpus based on query parameters.
/// Returns the text, or one word per line when `output=words`.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let corpus = query.corpus.as_deref().unwrap_or("tnc").trim().to_lowercase();
	let models = match shared_data.models.get(&corpus) {
		Some(models) => models,
		None => return HttpResponse::BadRequest().body(format!("Corpus '{corpus}' is not loaded")),
	};

	match query.generate(models) {
		Ok(Output::Text(text)) => HttpResponse::Ok().body(text),
		Ok(Output::Words(words)) => HttpResponse::Ok().body(words.join("\n")),
		Err(e) => HttpResponse::BadRequest().body(e),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let provider = match &shared_data.provider {
		Some(provider) => provider,
		None => return HttpResponse::InternalServerError().body("No data directory configured"),
	};
	match provider.list_corpora() {
		Ok(corpora) => HttpResponse::Ok().body(corpora.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let mut names: Vec<&str> = shared_data.models.keys().map(String::as_str).collect();
	names.sort_unstable();
	HttpResponse::Ok().body(names.join("\n"))
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim().to_lowercase())
		.filter(|s| !s.is_empty())
		.collect();

	for name in corpus_names {
		let loaded = match &shared_data.provider {
			Some(provider) => CorpusModels::load(provider, &name),
			None => return HttpResponse::InternalServerError().body("No data directory configured"),
		};
		match loaded {
			Ok(models) => {
				shared_data.models.insert(name, models);
			}
			Err(e @ (GenError::UnknownCorpus(_) | GenError::UnsupportedCorpus { .. })) => {
				warn!("Rejected corpus {name}: {e}");
				return HttpResponse::BadRequest().body(format!("Failed to load corpus: {e}"));
			}
			Err(e) => {
				error!("Failed to load corpus {name}: {e}");
				return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}"));
			}
		}
	}

	HttpResponse::Ok().body("Corpora loaded successfully")
}

fn app_config(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_corpora)
		.service(put_corpora)
		.service(get_loaded_corpora);
}

/// Main entry point for the server.
///
/// Reads the configuration from the environment, preloads the requested
/// corpora, wraps the state in a `Mutex` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	let config = ServerConfig::from_env()?;
	let provider = FileCorpus::new(&config.data_dir)?;

	let mut models = HashMap::new();
	for name in &config.preload {
		models.insert(name.clone(), CorpusModels::load(&provider, name)?);
	}

	let shared_model = web::Data::new(Mutex::new(SharedData { provider: Some(provider), models }));

	info!("Listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.configure(app_config)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use actix_web::{test, App};
	use rs_wordgen_core::corpus::MemoryCorpus;
	use rs_wordgen_core::model::frequency::table;

	use super::*;

	fn state() -> web::Data<Mutex<SharedData>> {
		let provider = MemoryCorpus::new()
			.with_unigram("tnc", table([(["แมว"], 2), (["กิน"], 2), (["ปลา"], 1)]))
			.with_bigram("tnc", table([(["แมว", "กิน"], 2), (["กิน", "ปลา"], 1)]))
			.with_trigram("tnc", table([(["แมว", "กิน", "ปลา"], 1)]));
		let mut models = HashMap::new();
		models.insert("tnc".to_owned(), CorpusModels::load(&provider, "tnc").unwrap());
		web::Data::new(Mutex::new(SharedData { provider: None, models }))
	}

	async fn call(uri: &str) -> (u16, String) {
		let app = test::init_service(App::new().app_data(state()).configure(app_config)).await;
		let req = test::TestRequest::get().uri(uri).to_request();
		let resp = test::call_service(&app, req).await;
		let status = resp.status().as_u16();
		let body = test::read_body(resp).await;
		(status, String::from_utf8_lossy(&body).into_owned())
	}

	#[actix_web::test]
	async fn generates_bigram_text() {
		let (status, body) = call("/v1/generate?model=bigram&seed=%E0%B9%81%E0%B8%A1%E0%B8%A7&rng_seed=1").await;
		assert_eq!(status, 200);
		assert_eq!(body, "แมวกินปลา");
	}

	#[actix_web::test]
	async fn generates_trigram_words() {
		let uri = "/v1/generate?model=trigram&seed=%E0%B9%81%E0%B8%A1%E0%B8%A7,%E0%B8%81%E0%B8%B4%E0%B8%99&output=words";
		let (status, body) = call(uri).await;
		assert_eq!(status, 200);
		assert_eq!(body, "แมว\nกิน\nปลา");
	}

	#[actix_web::test]
	async fn rejects_bad_queries() {
		assert_eq!(call("/v1/generate?corpus=oscar").await.0, 400);
		assert_eq!(call("/v1/generate?threshold=-1").await.0, 400);
		assert_eq!(call("/v1/generate?output=json").await.0, 400);
		assert_eq!(call("/v1/generate?model=trigram&seed=one").await.0, 400);
		assert_eq!(call("/v1/generate?model=trigram&seed=a,b,c").await.0, 400);
	}

	#[actix_web::test]
	async fn huge_length_is_bounded_by_the_corpus() {
		let (status, body) = call("/v1/generate?model=bigram&seed=%E0%B9%81%E0%B8%A1%E0%B8%A7&length=1099511627776").await;
		assert_eq!(status, 200);
		assert_eq!(body, "แมวกินปลา");
	}

	#[actix_web::test]
	async fn lists_loaded_corpora() {
		assert_eq!(call("/v1/loaded_corpora").await, (200, "tnc".to_owned()));
	}
}
