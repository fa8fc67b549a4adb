//! Domain models for `ClearScrape`.
//!
//! ## Submodules
//!
//! - [`domain`] - Extraction targets ([`Domain`])
//! - [`options`] - Scrape directives and payload building ([`ScrapeOptions`])
//! - [`response`] - Response mapping ([`ScrapeResponse`])
//! - [`proxy`] - Proxy and browser endpoint helpers ([`ProxyConfig`])

mod domain;
mod options;
mod proxy;
mod response;

pub use domain::Domain;
pub use options::ScrapeOptions;
pub use proxy::{BROWSER_WS_HOST, PROXY_HOST, PROXY_PORT, ProxyConfig, browser_ws_url};
pub use response::ScrapeResponse;
