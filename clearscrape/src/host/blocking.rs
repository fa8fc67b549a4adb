//! Blocking HTTP transport.

use async_trait::async_trait;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{RawResponse, Transport, default_headers, retry_after_secs};
use crate::error::{ClearScrapeError, TransportError};

/// Transport backed by a blocking `reqwest` client.
///
/// Its futures never yield: every call blocks the current thread until the
/// exchange or the sleep finishes. Meant to be driven with
/// `futures::executor::block_on`, outside any async runtime.
#[derive(Debug, Clone)]
pub struct BlockingHttpTransport {
    inner: Client,
}

impl BlockingHttpTransport {
    /// Creates a transport that authenticates with `api_key`.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ClearScrapeError> {
        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(api_key)?)
            .build()?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for BlockingHttpTransport {
    #[instrument(skip(self, payload), fields(url = %url))]
    async fn post_json(&self, url: &str, payload: &Value) -> Result<RawResponse, TransportError> {
        debug!("POST request with JSON (blocking)");

        let response = self.inner.post(url).json(payload).send()?;
        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        debug!(status, "Response received");

        let body = response.text()?;
        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }

    async fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
