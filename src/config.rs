//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base, matching the local development server.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
/// Default location of the CLI credential file.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".drus/credentials.json";
/// Simulated latency for the slow mock routes.
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 1500;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base prepended to every request path (e.g. `http://localhost:3000`)
    pub api_base: String,
    /// File holding the persisted token; `None` keeps it in memory only
    pub credentials_path: Option<PathBuf>,
    /// Substitute fixture responses when the API is unreachable or errors
    pub mock_fallback: bool,
    /// Artificial delay applied by the slow mock routes
    pub mock_latency: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            credentials_path: None,
            mock_fallback: true,
            mock_latency: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base = match env::var("DRUS_API_BASE") {
            Ok(v) => parse_api_base(&v).ok_or(ConfigError::Invalid("DRUS_API_BASE", v))?,
            Err(_) => DEFAULT_API_BASE.to_string(),
        };

        let credentials_path = match env::var("DRUS_CREDENTIALS_FILE") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(PathBuf::from(v.trim())),
            Err(_) => Some(PathBuf::from(DEFAULT_CREDENTIALS_FILE)),
        };

        let mock_fallback = match env::var("DRUS_MOCK_FALLBACK") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("DRUS_MOCK_FALLBACK", v))?,
            Err(_) => true,
        };

        let mock_latency = match env::var("DRUS_MOCK_LATENCY_MS") {
            Ok(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DRUS_MOCK_LATENCY_MS", v.clone()))?,
            ),
            Err(_) => Duration::from_millis(DEFAULT_MOCK_LATENCY_MS),
        };

        Ok(Self {
            api_base,
            credentials_path,
            mock_fallback,
            mock_latency,
        })
    }
}

/// An absolute http(s) URL, without trailing slashes.
fn parse_api_base(value: &str) -> Option<String> {
    let base = value.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(base).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| base.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
