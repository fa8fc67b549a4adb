//! Error classification for non-2xx responses.
//!
//! | status        | error                   | retried          |
//! |---------------|-------------------------|------------------|
//! | 401           | `AuthenticationFailed`  | no               |
//! | 402           | `InsufficientCredits`   | no               |
//! | 429           | `RateLimited`           | yes, fixed delay |
//! | other 4xx     | `Api`                   | no               |
//! | anything else | `Api`                   | yes, backoff     |

use serde_json::Value;

use crate::error::ClearScrapeError;
use crate::host::RawResponse;

/// Message used when the service gives none.
const UNKNOWN_ERROR: &str = "Unknown error";

// ============================================================================
// Disposition
// ============================================================================

/// What the executor should do with a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Fail immediately.
    Fatal,
    /// Retry after the fixed rate-limit delay.
    RateLimit,
    /// Retry after exponential backoff.
    Backoff,
}

/// Classifies a non-2xx status code.
pub fn disposition(status: u16) -> Disposition {
    match status {
        429 => Disposition::RateLimit,
        400..=499 => Disposition::Fatal,
        _ => Disposition::Backoff,
    }
}

// ============================================================================
// API Failure
// ============================================================================

/// A non-2xx response, decoded as far as possible.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// HTTP status code.
    pub status: u16,
    /// Message extracted from the body.
    pub message: String,
    /// Decoded body, `None` if it was not JSON.
    pub body: Option<Value>,
    /// Seconds from the `Retry-After` header.
    pub retry_after: Option<u64>,
}

impl ApiFailure {
    /// Decodes a failed response.
    pub fn from_response(response: &RawResponse) -> Self {
        let body = serde_json::from_str::<Value>(&response.body).ok();
        let message = match &body {
            Some(body) => error_message(body),
            None => fallback_message(&response.body),
        };

        Self {
            status: response.status,
            message,
            body,
            retry_after: response.retry_after,
        }
    }

    /// Returns how the executor should treat this failure.
    pub fn disposition(&self) -> Disposition {
        disposition(self.status)
    }

    /// Converts the failure into the error surfaced to callers.
    pub fn into_error(self) -> ClearScrapeError {
        match self.status {
            401 => ClearScrapeError::AuthenticationFailed {
                message: self.message,
            },
            402 => ClearScrapeError::InsufficientCredits {
                required: self
                    .body
                    .as_ref()
                    .and_then(|b| b.get("required"))
                    .and_then(Value::as_u64),
                message: self.message,
            },
            429 => ClearScrapeError::RateLimited {
                message: self.message,
                retry_after: self.retry_after,
            },
            status => ClearScrapeError::Api {
                message: self.message,
                status_code: Some(status),
                body: self.body,
            },
        }
    }
}

/// Extracts the message from an error body: `message`, then `error`, then
/// a generic fallback.
pub fn error_message(body: &Value) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}

fn fallback_message(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(status: u16, body: &str) -> ApiFailure {
        ApiFailure::from_response(&RawResponse {
            status,
            body: body.to_string(),
            retry_after: None,
        })
    }

    #[test]
    fn test_disposition_table() {
        assert_eq!(disposition(401), Disposition::Fatal);
        assert_eq!(disposition(402), Disposition::Fatal);
        assert_eq!(disposition(404), Disposition::Fatal);
        assert_eq!(disposition(422), Disposition::Fatal);
        assert_eq!(disposition(429), Disposition::RateLimit);
        assert_eq!(disposition(500), Disposition::Backoff);
        assert_eq!(disposition(503), Disposition::Backoff);
        assert_eq!(disposition(304), Disposition::Backoff);
    }

    #[test]
    fn test_message_preference() {
        assert_eq!(
            error_message(&json!({ "message": "m", "error": "e" })),
            "m"
        );
        assert_eq!(error_message(&json!({ "error": "e" })), "e");
        assert_eq!(error_message(&json!({ "message": "", "error": "e" })), "e");
        assert_eq!(error_message(&json!({ "message": null })), "Unknown error");
        assert_eq!(error_message(&json!({})), "Unknown error");
    }

    #[test]
    fn test_authentication_failed() {
        let err = failure(401, r#"{"message":"Invalid API key"}"#).into_error();
        assert!(matches!(
            err,
            ClearScrapeError::AuthenticationFailed { ref message } if message == "Invalid API key"
        ));
    }

    #[test]
    fn test_insufficient_credits_carries_required() {
        let err = failure(402, r#"{"error":"Not enough credits","required":25}"#).into_error();
        match err {
            ClearScrapeError::InsufficientCredits { message, required } => {
                assert_eq!(message, "Not enough credits");
                assert_eq!(required, Some(25));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let mut f = failure(429, r#"{"message":"Slow down"}"#);
        f.retry_after = Some(12);
        assert!(matches!(
            f.into_error(),
            ClearScrapeError::RateLimited { retry_after: Some(12), .. }
        ));
    }

    #[test]
    fn test_generic_error_keeps_body() {
        let err = failure(400, r#"{"error":"url is invalid","field":"url"}"#).into_error();
        match err {
            ClearScrapeError::Api {
                message,
                status_code,
                body,
            } => {
                assert_eq!(message, "url is invalid");
                assert_eq!(status_code, Some(400));
                assert_eq!(body.unwrap()["field"], "url");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body() {
        let f = failure(502, "<html>Bad Gateway</html>");
        assert_eq!(f.message, "<html>Bad Gateway</html>");
        assert!(f.body.is_none());

        let f = failure(500, "");
        assert_eq!(f.message, "Unknown error");
    }
}
