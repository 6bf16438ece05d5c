use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// Every variable has a default, so the binary runs against a local
/// backend with no setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            base_url: env_or("WORKBENCH_BASE_URL", "http://127.0.0.1:8001"),
            request_timeout_secs: env_or("WORKBENCH_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("WORKBENCH_TIMEOUT_SECS must be a number of seconds")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
