//! Blocking `ClearScrape` client.
//!
//! Same operations and results as the async [`crate::ClearScrape`]; every
//! call blocks the current thread until the request and all of its retries
//! finish. Do not call it from inside an async runtime.
//!
//! ```no_run
//! use clearscrape::blocking::ClearScrape;
//!
//! # fn run() -> Result<(), clearscrape::ClearScrapeError> {
//! let client = ClearScrape::new("your-api-key")?;
//! let png = client.screenshot("https://example.com", None)?;
//! std::fs::write("example.png", png).ok();
//! # Ok(())
//! # }
//! ```

use clearscrape_core::{Domain, ProxyConfig, ScrapeOptions, ScrapeResponse};
use futures::executor::block_on;
use serde_json::{Map, Value};

use crate::client::ScrapeClient;
use crate::config::ClientConfig;
use crate::error::ClearScrapeError;
use crate::host::blocking::BlockingHttpTransport;

/// Blocking `ClearScrape` client.
#[derive(Debug, Clone)]
pub struct ClearScrape {
    inner: ScrapeClient<BlockingHttpTransport>,
}

impl ClearScrape {
    /// Creates a blocking client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClearScrapeError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates a blocking client from a configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClearScrapeError> {
        config.validate()?;
        let transport = BlockingHttpTransport::new(&config.api_key, config.timeout())?;
        Ok(Self {
            inner: ScrapeClient::with_transport(config, transport)?,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Releases the underlying transport.
    pub fn close(self) {
        self.inner.close();
    }

    /// Scrapes a URL. See [`ScrapeClient::scrape`].
    pub fn scrape(
        &self,
        options: impl Into<ScrapeOptions>,
    ) -> Result<ScrapeResponse, ClearScrapeError> {
        block_on(self.inner.scrape(options))
    }

    /// Scrapes a URL and returns only the HTML.
    pub fn get_html(&self, options: impl Into<ScrapeOptions>) -> Result<String, ClearScrapeError> {
        block_on(self.inner.get_html(options))
    }

    /// Scrapes a URL and returns only the text.
    pub fn get_text(&self, options: impl Into<ScrapeOptions>) -> Result<String, ClearScrapeError> {
        block_on(self.inner.get_text(options))
    }

    /// Captures a screenshot. See [`ScrapeClient::screenshot`].
    pub fn screenshot(
        &self,
        options: impl Into<ScrapeOptions>,
        selector: Option<&str>,
    ) -> Result<Vec<u8>, ClearScrapeError> {
        block_on(self.inner.screenshot(options, selector))
    }

    /// Extracts structured data. See [`ScrapeClient::extract`].
    pub fn extract(
        &self,
        options: impl Into<ScrapeOptions>,
        domain: Domain,
    ) -> Result<Map<String, Value>, ClearScrapeError> {
        block_on(self.inner.extract(options, domain))
    }

    /// Returns residential proxy credentials.
    pub fn get_proxy_config(&self, country: Option<&str>, session: Option<&str>) -> ProxyConfig {
        self.inner.get_proxy_config(country, session)
    }

    /// Returns the residential proxy URL.
    pub fn get_proxy_url(&self, country: Option<&str>, session: Option<&str>) -> String {
        self.inner.get_proxy_url(country, session)
    }

    /// Returns the scraping browser `WebSocket` URL.
    pub fn get_browser_ws_url(&self, proxy_country: Option<&str>) -> String {
        self.inner.get_browser_ws_url(proxy_country)
    }
}
