//! Retry policy for API requests.
//!
//! Attempts are numbered from 1. After a failed attempt `n` with budget
//! left, the executor waits `unit * 2^n` (transport failures and 5xx) or a
//! flat `5 * unit` (HTTP 429). Backoff has no ceiling and no jitter.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::classify::{ApiFailure, Disposition};
use crate::error::{ClearScrapeError, TransportError};
use crate::executor::SCRAPE_ENDPOINT;
use crate::host::RawResponse;

/// Rate-limit delay, in backoff units.
const RATE_LIMIT_UNITS: u32 = 5;

/// Message for a timeout that exhausted the budget.
const TIMEOUT_MESSAGE: &str = "Request timed out";

// ============================================================================
// Step
// ============================================================================

/// Outcome of one attempt, as decided by [`RetryStrategy::decide`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The request succeeded with this JSON object.
    Succeeded(Value),
    /// Wait `delay`, then try again.
    Retry {
        /// Time to wait before the next attempt.
        delay: Duration,
        /// Endpoint for the next attempt; `None` keeps the current one.
        endpoint: Option<&'static str>,
    },
}

// ============================================================================
// Retry Strategy
// ============================================================================

/// Strategy for retrying failed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// The unit backoff and rate-limit delays are expressed in.
    pub backoff_unit: Duration,
}

impl RetryStrategy {
    /// Creates a new retry strategy with a one-second unit.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit: Duration::from_secs(1),
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the backoff unit.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Calculates the backoff after failed attempt `attempt`: `unit * 2^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Delay after an HTTP 429, independent of the attempt number.
    pub fn rate_limit_delay(&self) -> Duration {
        self.backoff_unit.saturating_mul(RATE_LIMIT_UNITS)
    }

    /// Returns true if another attempt may follow attempt `attempt`.
    pub fn has_budget(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Decides what follows attempt `attempt` given its outcome.
    ///
    /// `Err` is terminal. Retries after an HTTP error are always sent to
    /// the scrape endpoint; retries after a transport failure keep the
    /// endpoint of the failed attempt.
    pub fn decide(
        &self,
        attempt: u32,
        outcome: Result<RawResponse, TransportError>,
    ) -> Result<Step, ClearScrapeError> {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => return self.decide_transport_failure(attempt, err),
        };

        if response.is_success() {
            return parse_success(&response.body).map(Step::Succeeded);
        }

        let failure = ApiFailure::from_response(&response);
        let delay = match failure.disposition() {
            Disposition::Fatal => {
                debug!(status = failure.status, "Non-retryable API error");
                return Err(failure.into_error());
            }
            Disposition::RateLimit => self.rate_limit_delay(),
            Disposition::Backoff => self.delay_for_attempt(attempt),
        };

        if !self.has_budget(attempt) {
            debug!(status = failure.status, attempt, "Retry budget exhausted");
            return Err(failure.into_error());
        }

        Ok(Step::Retry {
            delay,
            endpoint: Some(SCRAPE_ENDPOINT),
        })
    }

    fn decide_transport_failure(
        &self,
        attempt: u32,
        err: TransportError,
    ) -> Result<Step, ClearScrapeError> {
        if self.has_budget(attempt) {
            return Ok(Step::Retry {
                delay: self.delay_for_attempt(attempt),
                endpoint: None,
            });
        }

        debug!(error = %err, attempt, "Retry budget exhausted");
        Err(match err {
            TransportError::Timeout(_) => ClearScrapeError::Timeout {
                message: TIMEOUT_MESSAGE.to_string(),
            },
            TransportError::Request(message) => ClearScrapeError::Api {
                message,
                status_code: None,
                body: None,
            },
        })
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Decodes a 2xx body, which must be a JSON object.
fn parse_success(body: &str) -> Result<Value, ClearScrapeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClearScrapeError::InvalidResponse(format!("JSON error: {e}")))?;

    if value.is_object() {
        Ok(value)
    } else {
        Err(ClearScrapeError::InvalidResponse(
            "expected a JSON object".to_string(),
        ))
    }
}
