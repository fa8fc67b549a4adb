//! Async HTTP transport.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{RawResponse, Transport, default_headers, retry_after_secs};
use crate::error::{ClearScrapeError, TransportError};

// ============================================================================
// HTTP Transport
// ============================================================================

/// Transport backed by an async `reqwest` client.
///
/// The inner client pools connections and is shared by every request made
/// through one `ClearScrape` instance.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Creates a transport that authenticates with `api_key`.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ClearScrapeError> {
        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(api_key)?)
            .build()?;

        Ok(Self { inner })
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, payload), fields(url = %url))]
    async fn post_json(&self, url: &str, payload: &Value) -> Result<RawResponse, TransportError> {
        debug!("POST request with JSON");

        let response = self.inner.post(url).json(payload).send().await?;
        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        debug!(status, "Response received");

        let body = response.text().await?;
        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }

    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
