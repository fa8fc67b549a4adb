//! Core error types for `ClearScrape`.

use thiserror::Error;

/// Core error type for model validation and mapping.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Scrape options failed validation.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Response body did not have the expected shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unknown extraction domain.
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
