//! Scrape directives and the request payload they serialize to.
//!
//! The `Serialize` impl *is* the payload builder: `url` is always present,
//! every other field only when it differs from its default. The service
//! applies its own defaults for anything left out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::domain::Domain;
use crate::error::CoreError;

/// HTTP method the service uses when it is not told otherwise.
const DEFAULT_METHOD: &str = "GET";

// ============================================================================
// Scrape Options
// ============================================================================

/// Options for a single scrape request.
///
/// Built per call. A bare URL converts into options with every default:
///
/// ```
/// use clearscrape_core::{Domain, ScrapeOptions};
///
/// let plain: ScrapeOptions = "https://example.com".into();
/// assert_eq!(plain.to_payload().unwrap(), serde_json::json!({ "url": "https://example.com" }));
///
/// let rendered = ScrapeOptions::new("https://www.amazon.com/dp/B09V3KXJPB")
///     .with_js_render(true)
///     .with_wait_for("#productTitle")
///     .with_domain(Domain::Amazon);
/// assert!(rendered.js_render);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Target URL.
    pub url: String,

    /// HTTP method the service uses against the target.
    #[serde(skip_serializing_if = "is_default_method")]
    pub method: String,

    /// Render JavaScript in a headless browser.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub js_render: bool,

    /// Route through residential proxies.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub premium_proxy: bool,

    /// Enable antibot bypass.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub antibot: bool,

    /// Two-letter country code for geo-targeting.
    #[serde(skip_serializing_if = "is_blank")]
    pub proxy_country: Option<String>,

    /// CSS selector to wait for before returning.
    #[serde(skip_serializing_if = "is_blank")]
    pub wait_for: Option<String>,

    /// Extra wait in milliseconds.
    #[serde(skip_serializing_if = "is_unset")]
    pub wait: Option<u64>,

    /// Scroll the page to trigger lazy loading.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub auto_scroll: bool,

    /// Capture a screenshot.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub screenshot: bool,

    /// CSS selector of the element to screenshot.
    #[serde(skip_serializing_if = "is_blank")]
    pub screenshot_selector: Option<String>,

    /// Custom headers forwarded to the target.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Request body for non-GET methods.
    #[serde(skip_serializing_if = "is_blank")]
    pub body: Option<String>,

    /// Server-side extractor to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

fn is_default_method(method: &str) -> bool {
    method == DEFAULT_METHOD
}

#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn is_unset(value: &Option<u64>) -> bool {
    value.is_none_or(|v| v == 0)
}

impl ScrapeOptions {
    /// Creates options for the given URL with every other field at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Enables or disables JavaScript rendering.
    pub fn with_js_render(mut self, enabled: bool) -> Self {
        self.js_render = enabled;
        self
    }

    /// Enables or disables residential proxies.
    pub fn with_premium_proxy(mut self, enabled: bool) -> Self {
        self.premium_proxy = enabled;
        self
    }

    /// Enables or disables antibot bypass.
    pub fn with_antibot(mut self, enabled: bool) -> Self {
        self.antibot = enabled;
        self
    }

    /// Sets the proxy country.
    pub fn with_proxy_country(mut self, country: impl Into<String>) -> Self {
        self.proxy_country = Some(country.into());
        self
    }

    /// Sets the CSS selector to wait for.
    pub fn with_wait_for(mut self, selector: impl Into<String>) -> Self {
        self.wait_for = Some(selector.into());
        self
    }

    /// Sets the extra wait in milliseconds.
    pub fn with_wait(mut self, millis: u64) -> Self {
        self.wait = Some(millis);
        self
    }

    /// Enables or disables auto scrolling.
    pub fn with_auto_scroll(mut self, enabled: bool) -> Self {
        self.auto_scroll = enabled;
        self
    }

    /// Enables or disables screenshot capture.
    pub fn with_screenshot(mut self, enabled: bool) -> Self {
        self.screenshot = enabled;
        self
    }

    /// Sets the screenshot selector.
    pub fn with_screenshot_selector(mut self, selector: impl Into<String>) -> Self {
        self.screenshot_selector = Some(selector.into());
        self
    }

    /// Adds a custom header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the extraction domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Checks the options before anything is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.url.trim().is_empty() {
            return Err(CoreError::InvalidOptions("url is required".to_string()));
        }
        Ok(())
    }

    /// Builds the JSON payload for `/api/scrape`.
    pub fn to_payload(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: DEFAULT_METHOD.to_string(),
            js_render: false,
            premium_proxy: false,
            antibot: false,
            proxy_country: None,
            wait_for: None,
            wait: None,
            auto_scroll: false,
            screenshot: false,
            screenshot_selector: None,
            headers: BTreeMap::new(),
            body: None,
            domain: None,
        }
    }
}

impl From<&str> for ScrapeOptions {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ScrapeOptions {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}
