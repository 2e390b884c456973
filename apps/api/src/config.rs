use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_INFERENCE_BASE_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on unparsable values.
#[derive(Debug, Clone)]
pub struct Config {
    pub inference_base_url: String,
    pub inference_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            inference_base_url: lookup("INFERENCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string()),
            inference_timeout: Duration::from_secs(
                lookup("INFERENCE_TIMEOUT_SECS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse::<u64>()
                    .context("INFERENCE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
