// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ClearScrape` Core
//!
//! Request and response models for the `ClearScrape` API client.
//!
//! Nothing in this crate touches the network. It holds the data contracts
//! shared by the blocking and async clients so both serialize options and
//! parse responses the same way:
//!
//! - [`ScrapeOptions`] - scrape directives, serialized as the minimal payload
//! - [`ScrapeResponse`] - typed view of the `{ success, credits_used, data }` body
//! - [`Domain`] - supported server-side extractors
//! - [`ProxyConfig`] - residential proxy credentials derived from an API key
//! - [`browser_ws_url`] - scraping browser endpoint

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    BROWSER_WS_HOST, Domain, PROXY_HOST, PROXY_PORT, ProxyConfig, ScrapeOptions, ScrapeResponse,
    browser_ws_url,
};
