//! Transport abstraction.
//!
//! A [`Transport`] issues the JSON POST and performs the backoff wait. It is
//! the only part of the client that differs between the async and the
//! blocking flavors:
//!
//! - [`http::HttpTransport`] - async `reqwest` client, `tokio` sleep
//! - [`blocking::BlockingHttpTransport`] - blocking `reqwest` client, thread sleep

pub mod blocking;
pub mod http;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use crate::error::{ClearScrapeError, TransportError};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("clearscrape-rust/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key (`X-API-Key`).
const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// Transport Trait
// ============================================================================

/// A response with any status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
    /// Seconds from the `Retry-After` header.
    pub retry_after: Option<u64>,
}

impl RawResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network effects used by the request executor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `payload` as JSON to `url`.
    ///
    /// Any received status is `Ok`; only failures below HTTP are `Err`.
    async fn post_json(&self, url: &str, payload: &Value) -> Result<RawResponse, TransportError>;

    /// Waits before the next attempt.
    async fn sleep(&self, delay: Duration);
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Headers attached to every request made with `api_key`.
fn default_headers(api_key: &str) -> Result<HeaderMap, ClearScrapeError> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key)
        .map_err(|e| ClearScrapeError::InvalidConfig(format!("Invalid API key: {e}")))?;
    key.set_sensitive(true);

    headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

    Ok(headers)
}

/// Reads the `Retry-After` header as whole seconds.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
