use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub nlp_service_url: Url,
    pub nlp_timeout: Duration,
    pub catalog_path: PathBuf,
    pub catalog_cache: bool,
    pub static_files_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is this
    /// function over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Check if we're in production mode
        let is_production = lookup("RUST_ENV")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            == "production";

        let server_address = lookup("SERVER_ADDRESS").unwrap_or_else(|| {
            if is_production {
                "0.0.0.0:5000".to_string()
            } else {
                "127.0.0.1:5000".to_string()
            }
        });

        let raw_url = lookup("NLP_SERVICE_URL").unwrap_or_else(|| "http://localhost:8000".to_string());
        let nlp_service_url = Url::parse(&raw_url)
            .with_context(|| format!("NLP_SERVICE_URL is not a valid URL: {}", raw_url))?;

        let nlp_timeout = match lookup("NLP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("NLP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", raw))?;
                if secs == 0 {
                    anyhow::bail!("NLP_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(10),
        };

        let catalog_cache = match lookup("CATALOG_CACHE") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("CATALOG_CACHE must be true or false, got {:?}", raw))?,
            None => true,
        };

        Ok(Config {
            server_address,
            nlp_service_url,
            nlp_timeout,
            catalog_path: lookup("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/tools.json")),
            catalog_cache,
            static_files_path: lookup("STATIC_FILES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
