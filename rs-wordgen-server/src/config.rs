use std::env;
use std::path::PathBuf;

/// Server settings, read from the environment.
///
/// | variable            | default     |
/// |---------------------|-------------|
/// | `WORDGEN_DATA_DIR`  | `./data`    |
/// | `WORDGEN_HOST`      | `127.0.0.1` |
/// | `WORDGEN_PORT`      | `5000`      |
/// | `WORDGEN_PRELOAD`   | (none)      |
///
/// `WORDGEN_PRELOAD` is a comma-separated list of corpus ids loaded at start-up.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
	pub data_dir: PathBuf,
	pub host: String,
	pub port: u16,
	pub preload: Vec<String>,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("./data"),
			host: "127.0.0.1".to_owned(),
			port: 5000,
			preload: Vec::new(),
		}
	}
}

impl ServerConfig {
	pub fn from_env() -> Result<Self, String> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from any key lookup (the environment in production).
	///
	/// # Errors
	/// Returns an error if the port is not a valid `u16`.
	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, String> {
		let mut config = Self::default();

		if let Some(dir) = lookup("WORDGEN_DATA_DIR").filter(|s| !s.trim().is_empty()) {
			config.data_dir = PathBuf::from(dir.trim());
		}
		if let Some(host) = lookup("WORDGEN_HOST").filter(|s| !s.trim().is_empty()) {
			config.host = host.trim().to_owned();
		}
		if let Some(port) = lookup("WORDGEN_PORT") {
			config.port = port
				.trim()
				.parse()
				.map_err(|_| format!("WORDGEN_PORT must be a port number, got '{port}'"))?;
		}
		if let Some(preload) = lookup("WORDGEN_PRELOAD") {
			config.preload = preload
				.split(',')
				.map(|s| s.trim().to_lowercase())
				.filter(|s| !s.is_empty())
				.collect();
		}

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |key: &str| map.get(key).cloned()
	}

	#[test]
	fn defaults_when_unset() {
		assert_eq!(ServerConfig::from_lookup(lookup(&[])).unwrap(), ServerConfig::default());
	}

	#[test]
	fn reads_overrides() {
		let config = ServerConfig::from_lookup(lookup(&[
			("WORDGEN_DATA_DIR", "/srv/corpora"),
			("WORDGEN_PORT", "8080"),
			("WORDGEN_PRELOAD", "TNC, ttc,,"),
		]))
		.unwrap();
		assert_eq!(config.data_dir, PathBuf::from("/srv/corpora"));
		assert_eq!(config.port, 8080);
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.preload, vec!["tnc", "ttc"]);
	}

	#[test]
	fn rejects_bad_port() {
		assert!(ServerConfig::from_lookup(lookup(&[("WORDGEN_PORT", "http")])).is_err());
	}
}
