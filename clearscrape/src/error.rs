//! Client error types.

use clearscrape_core::CoreError;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Main Client Error
// ============================================================================

/// Error type for every client operation.
///
/// API failures carry the status code and, where the service sent one, the
/// decoded error body. `Display` renders them as `[status] message`.
#[derive(Debug, Error)]
pub enum ClearScrapeError {
    /// Client configuration was rejected before any request was made.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Scrape options were rejected before any request was made.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The API key was rejected (HTTP 401).
    #[error("[401] {message}")]
    AuthenticationFailed {
        /// Message from the service.
        message: String,
    },

    /// The account lacks credits for the request (HTTP 402).
    #[error("[402] {message}")]
    InsufficientCredits {
        /// Message from the service.
        message: String,
        /// Credits the request would have needed.
        required: Option<u64>,
    },

    /// Rate limited after the retry budget was spent (HTTP 429).
    #[error("[429] {message}")]
    RateLimited {
        /// Message from the service.
        message: String,
        /// Seconds from the `Retry-After` header, if sent.
        retry_after: Option<u64>,
    },

    /// Every attempt timed out.
    #[error("[408] {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// Any other API or transport failure.
    #[error("{}", api_display(.status_code, .message))]
    Api {
        /// Message from the service or transport.
        message: String,
        /// HTTP status, `None` for transport failures.
        status_code: Option<u16>,
        /// Decoded error body, if it was JSON.
        body: Option<Value>,
    },

    /// A screenshot was requested but none came back.
    #[error("Screenshot not returned")]
    MissingScreenshot,

    /// An extraction was requested but no data came back.
    #[error("No extracted data returned")]
    MissingExtractedData,

    /// A successful response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Screenshot payload was not valid base64.
    #[error("Invalid screenshot encoding: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[allow(clippy::ref_option)]
fn api_display(status_code: &Option<u16>, message: &str) -> String {
    match status_code {
        Some(status) => format!("[{status}] {message}"),
        None => message.to_string(),
    }
}

impl ClearScrapeError {
    /// Returns the HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::InsufficientCredits { .. } => Some(402),
            Self::RateLimited { .. } => Some(429),
            Self::Timeout { .. } => Some(408),
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Returns the message reported by the service, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed { message }
            | Self::InsufficientCredits { message, .. }
            | Self::RateLimited { message, .. }
            | Self::Timeout { message }
            | Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns true if the executor retries this condition while budget remains.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::Api { status_code, .. } => {
                status_code.is_none_or(|s| !(400..500).contains(&s))
            }
            _ => false,
        }
    }
}

impl From<CoreError> for ClearScrapeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidOptions(msg) => Self::InvalidOptions(msg),
            CoreError::UnknownDomain(domain) => {
                Self::InvalidOptions(format!("unknown domain: {domain}"))
            }
            CoreError::InvalidData(msg) => Self::InvalidResponse(msg),
            CoreError::Serialization(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}

// ============================================================================
// Transport Error
// ============================================================================

/// Failure below the HTTP layer: no status code was received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure.
    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}
