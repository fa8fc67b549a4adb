//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::ClearScrapeError;
use crate::retry::RetryStrategy;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.clearscrape.io";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CLEARSCRAPE_API_KEY";

const BASE_URL_ENV: &str = "CLEARSCRAPE_BASE_URL";
const TIMEOUT_ENV: &str = "CLEARSCRAPE_TIMEOUT_SECS";
const RETRIES_ENV: &str = "CLEARSCRAPE_RETRIES";

/// Client configuration, fixed for the lifetime of a client.
///
/// Deserializes with defaults for everything except the API key, so it can
/// be embedded in an application's own config file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as `X-API-Key`.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, fractions allowed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Total attempts per request, at least 1.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Backoff unit in milliseconds.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> f64 {
    60.0
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_unit_ms() -> u64 {
    1000
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }

    /// Loads configuration from `CLEARSCRAPE_*` environment variables.
    pub fn from_env() -> Result<Self, ClearScrapeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClearScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .ok_or_else(|| ClearScrapeError::InvalidConfig(format!("{API_KEY_ENV} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = parse_env(TIMEOUT_ENV, &timeout)?;
        }
        if let Some(retries) = lookup(RETRIES_ENV) {
            config.retries = parse_env(RETRIES_ENV, &retries)?;
        }

        Ok(config)
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Sets the attempt budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the backoff unit.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit_ms = u64::try_from(unit.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Checks the configuration before any transport is built.
    pub fn validate(&self) -> Result<(), ClearScrapeError> {
        if self.api_key.trim().is_empty() {
            return Err(ClearScrapeError::InvalidConfig(
                "API key is required".to_string(),
            ));
        }
        if self.retries == 0 {
            return Err(ClearScrapeError::InvalidConfig(
                "retries must be at least 1".to_string(),
            ));
        }
        if !Duration::try_from_secs_f64(self.timeout_secs).is_ok_and(|t| !t.is_zero()) {
            return Err(ClearScrapeError::InvalidConfig(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout_secs
            )));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ClearScrapeError::InvalidConfig(format!("Invalid base URL {:?}: {e}", self.base_url))
        })?;
        Ok(())
    }

    /// Base URL without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout. Falls back to the default if the configured value
    /// is not a valid duration.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout_secs()))
    }

    /// Retry strategy derived from the attempt budget and backoff unit.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.retries)
            .with_backoff_unit(Duration::from_millis(self.backoff_unit_ms))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("retries", &self.retries)
            .field("backoff_unit_ms", &self.backoff_unit_ms)
            .finish()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ClearScrapeError> {
    value
        .trim()
        .parse()
        .map_err(|_| ClearScrapeError::InvalidConfig(format!("{name} has invalid value {value:?}")))
}
