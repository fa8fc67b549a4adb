//! Request execution with retries.
//!
//! [`RequestExecutor`] holds the one retry loop used by both client flavors.
//! The transport decides whether "send" and "sleep" block or suspend.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ClearScrapeError;
use crate::host::Transport;
use crate::retry::{RetryStrategy, Step};

/// Path of the scrape endpoint.
pub const SCRAPE_ENDPOINT: &str = "/api/scrape";

/// Sends payloads to the API and applies the retry strategy.
#[derive(Debug, Clone)]
pub struct RequestExecutor<T> {
    transport: T,
    base_url: String,
    retry_strategy: RetryStrategy,
}

impl<T: Transport> RequestExecutor<T> {
    /// Creates an executor. `base_url` must not end with a slash.
    pub fn new(transport: T, base_url: impl Into<String>, retry_strategy: RetryStrategy) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            retry_strategy,
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the retry strategy.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// POSTs `payload` to `endpoint` and returns the decoded JSON object.
    ///
    /// Attempts run strictly one after another; the attempt counter is the
    /// only state and lives in this call.
    #[instrument(skip(self, payload), fields(endpoint = %endpoint))]
    pub async fn execute(&self, endpoint: &str, payload: &Value) -> Result<Value, ClearScrapeError> {
        let mut attempt = 1;
        let mut endpoint = endpoint;

        loop {
            let url = format!("{}{}", self.base_url, endpoint);
            debug!(url = %url, attempt, "Making POST request");

            let outcome = self.transport.post_json(&url, payload).await;

            match self.retry_strategy.decide(attempt, outcome)? {
                Step::Succeeded(value) => {
                    debug!(attempt, "Request succeeded");
                    return Ok(value);
                }
                Step::Retry {
                    delay,
                    endpoint: next,
                } => {
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Request failed, retrying"
                    );
                    self.transport.sleep(delay).await;
                    attempt += 1;
                    if let Some(next) = next {
                        endpoint = next;
                    }
                }
            }
        }
    }
}
