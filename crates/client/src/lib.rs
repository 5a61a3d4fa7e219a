pub mod api;
pub mod http;

use std::time::Duration;

use thiserror::Error;

pub use api::MovieApi;
pub use http::HttpMovieApi;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

pub const BASE_URL_ENV: &str = "CINESEARCH_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "CINESEARCH_TIMEOUT_MS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid CINESEARCH_TIMEOUT_MS value {0:?}")]
    InvalidTimeout(String),
    #[error("http client: {0}")]
    Http(String),
}

/// Where the backend lives and how long a request may take.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server origin, without the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read `CINESEARCH_API_BASE_URL` and `CINESEARCH_TIMEOUT_MS`, falling back
    /// to the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// `base_url` with trailing slashes stripped and `/api` appended.
    pub fn api_root(&self) -> Result<reqwest::Url, ConfigError> {
        let base = self.base_url.trim_end_matches('/');
        let root = format!("{base}/api");
        let url = reqwest::Url::parse(&root).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        Ok(url)
    }
}
