// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ClearScrape`
//!
//! Client for the `ClearScrape` web scraping API.
//!
//! Requests are POSTed to `{base_url}/api/scrape` with the API key in
//! `X-API-Key`. Failed requests are retried inside the client; callers only
//! see the final [`ClearScrapeError`].
//!
//! ## Clients
//!
//! - [`ClearScrape`] - async client (`tokio`)
//! - [`blocking::ClearScrape`] - blocking client with the same operations
//! - [`ScrapeClient`] - the shared implementation, usable with a custom
//!   [`host::Transport`]
//!
//! ## Request Pipeline
//!
//! - [`executor::RequestExecutor`] - the retry loop
//! - [`retry::RetryStrategy`] - attempt budget, backoff and per-attempt decisions
//! - [`classify`] - mapping of HTTP failures to error kinds
//!
//! ## Example
//!
//! ```no_run
//! use clearscrape::{ClearScrape, ScrapeOptions};
//!
//! # async fn run() -> Result<(), clearscrape::ClearScrapeError> {
//! let client = ClearScrape::new("your-api-key")?;
//!
//! let result = client
//!     .scrape(
//!         ScrapeOptions::new("https://example.com")
//!             .with_js_render(true)
//!             .with_wait_for(".content"),
//!     )
//!     .await?;
//! println!("{} ({} credits)", result.html, result.credits_used);
//!
//! let proxy_url = client.get_proxy_url(Some("us"), None);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod blocking;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod retry;

#[cfg(test)]
mod testing;

// Re-export key types at crate root

// Errors
pub use error::{ClearScrapeError, TransportError};

// Clients
pub use client::{ClearScrape, ScrapeClient};
pub use config::ClientConfig;

// Transport & retry
pub use executor::RequestExecutor;
pub use host::{
    RawResponse, Transport, blocking::BlockingHttpTransport, http::HttpTransport,
};
pub use retry::RetryStrategy;

// Models
pub use clearscrape_core::{Domain, ProxyConfig, ScrapeOptions, ScrapeResponse};
