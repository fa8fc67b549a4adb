//! API client facade.
//!
//! [`ScrapeClient`] implements every operation once, generic over the
//! [`Transport`]. [`ClearScrape`] is the async client; the blocking client in
//! [`crate::blocking`] wraps a `ScrapeClient` over a blocking transport.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clearscrape_core::{Domain, ProxyConfig, ScrapeOptions, ScrapeResponse, browser_ws_url};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::ClearScrapeError;
use crate::executor::{RequestExecutor, SCRAPE_ENDPOINT};
use crate::host::Transport;
use crate::host::http::HttpTransport;

/// Async `ClearScrape` client.
///
/// ```no_run
/// use clearscrape::{ClearScrape, Domain, ScrapeOptions};
///
/// # async fn run() -> Result<(), clearscrape::ClearScrapeError> {
/// let client = ClearScrape::new("your-api-key")?;
///
/// let page = client.scrape("https://example.com").await?;
/// println!("{}", page.html);
///
/// let product = client
///     .extract("https://www.amazon.com/dp/B09V3KXJPB", Domain::Amazon)
///     .await?;
/// println!("{:?}", product.get("title"));
///
/// let rendered = client
///     .get_html(ScrapeOptions::new("https://example.com").with_js_render(true))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub type ClearScrape = ScrapeClient<HttpTransport>;

// ============================================================================
// Scrape Client
// ============================================================================

/// `ClearScrape` API client over an arbitrary transport.
///
/// Dropping the client releases the transport; [`ScrapeClient::close`] does
/// the same explicitly.
#[derive(Clone)]
pub struct ScrapeClient<T> {
    api_key: String,
    executor: RequestExecutor<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ScrapeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeClient")
            .field("api_key", &"<redacted>")
            .field("executor", &self.executor)
            .finish()
    }
}

impl ScrapeClient<HttpTransport> {
    /// Creates an async client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClearScrapeError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates an async client from a configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClearScrapeError> {
        config.validate()?;
        let transport = HttpTransport::new(&config.api_key, config.timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> ScrapeClient<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// The transport is expected to authenticate with the configured key.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ClearScrapeError> {
        config.validate()?;
        let executor = RequestExecutor::new(
            transport,
            config.normalized_base_url(),
            config.retry_strategy(),
        );

        Ok(Self {
            api_key: config.api_key,
            executor,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Releases the underlying transport.
    pub fn close(self) {
        drop(self);
    }

    /// Scrapes a URL.
    ///
    /// Accepts a bare URL or full [`ScrapeOptions`].
    #[instrument(skip(self, options))]
    pub async fn scrape(
        &self,
        options: impl Into<ScrapeOptions>,
    ) -> Result<ScrapeResponse, ClearScrapeError> {
        let options: ScrapeOptions = options.into();
        options.validate()?;

        debug!(url = %options.url, domain = ?options.domain, "Scraping");
        let payload = options.to_payload()?;
        let body = self.executor.execute(SCRAPE_ENDPOINT, &payload).await?;

        let response = ScrapeResponse::from_value(body)?;
        debug!(credits_used = response.credits_used, "Scrape finished");
        Ok(response)
    }

    /// Scrapes a URL and returns only the HTML.
    pub async fn get_html(
        &self,
        options: impl Into<ScrapeOptions>,
    ) -> Result<String, ClearScrapeError> {
        Ok(self.scrape(options).await?.html)
    }

    /// Scrapes a URL and returns only the text, empty if none was returned.
    pub async fn get_text(
        &self,
        options: impl Into<ScrapeOptions>,
    ) -> Result<String, ClearScrapeError> {
        Ok(self.scrape(options).await?.text.unwrap_or_default())
    }

    /// Captures a screenshot and returns the decoded image bytes.
    ///
    /// JavaScript rendering and screenshot capture are always enabled.
    /// `selector` limits the capture to one element.
    pub async fn screenshot(
        &self,
        options: impl Into<ScrapeOptions>,
        selector: Option<&str>,
    ) -> Result<Vec<u8>, ClearScrapeError> {
        let options: ScrapeOptions = options.into();
        let mut options = options.with_js_render(true).with_screenshot(true);
        if let Some(selector) = selector {
            options = options.with_screenshot_selector(selector);
        }

        let response = self.scrape(options).await?;
        match response.screenshot.as_deref() {
            Some(data) if !data.is_empty() => decode_screenshot(data),
            _ => Err(ClearScrapeError::MissingScreenshot),
        }
    }

    /// Extracts structured data with a domain-specific extractor.
    pub async fn extract(
        &self,
        options: impl Into<ScrapeOptions>,
        domain: Domain,
    ) -> Result<Map<String, Value>, ClearScrapeError> {
        let options: ScrapeOptions = options.into();
        let response = self.scrape(options.with_domain(domain)).await?;

        response
            .extracted
            .filter(|data| !data.is_empty())
            .ok_or(ClearScrapeError::MissingExtractedData)
    }

    /// Returns residential proxy credentials.
    pub fn get_proxy_config(&self, country: Option<&str>, session: Option<&str>) -> ProxyConfig {
        ProxyConfig::for_credential(&self.api_key, country, session)
    }

    /// Returns the residential proxy URL.
    pub fn get_proxy_url(&self, country: Option<&str>, session: Option<&str>) -> String {
        self.get_proxy_config(country, session).url()
    }

    /// Returns the scraping browser `WebSocket` URL.
    pub fn get_browser_ws_url(&self, proxy_country: Option<&str>) -> String {
        browser_ws_url(&self.api_key, proxy_country)
    }
}

/// Decodes a base64 screenshot, dropping any `data:...,` prefix.
///
/// A data URL without a payload counts as a missing screenshot.
pub(crate) fn decode_screenshot(data: &str) -> Result<Vec<u8>, ClearScrapeError> {
    let encoded = if data.starts_with("data:") {
        data.split_once(',')
            .map(|(_, rest)| rest)
            .ok_or(ClearScrapeError::MissingScreenshot)?
    } else {
        data
    };

    let cleaned: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(ClearScrapeError::MissingScreenshot);
    }
    Ok(STANDARD.decode(cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn client(transport: MockTransport) -> ScrapeClient<MockTransport> {
        ScrapeClient::with_transport(
            ClientConfig::new("K").with_base_url("https://api.test/"),
            transport,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_key_fails_before_request() {
        let transport = MockTransport::new();
        let result = ScrapeClient::with_transport(ClientConfig::new(""), transport);
        assert!(matches!(result, Err(ClearScrapeError::InvalidConfig(_))));
    }

    #[test]
    fn test_async_client_rejects_empty_key() {
        assert!(matches!(
            ClearScrape::new(""),
            Err(ClearScrapeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_base_url_trimmed() {
        assert_eq!(client(MockTransport::new()).base_url(), "https://api.test");
    }

    #[tokio::test]
    async fn test_scrape_sends_minimal_payload() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({ "success": true, "credits_used": 1, "data": { "html": "<h1>Hi</h1>" } }),
        );

        let client = client(transport);
        let response = client.scrape("https://example.com").await.unwrap();

        assert_eq!(response.html, "<h1>Hi</h1>");
        assert_eq!(client.transport().urls(), ["https://api.test/api/scrape"]);
        assert_eq!(
            client.transport().payloads(),
            [json!({ "url": "https://example.com" })]
        );
    }

    #[tokio::test]
    async fn test_scrape_rejects_empty_url_without_request() {
        let client = client(MockTransport::new());
        let err = client.scrape("").await.unwrap_err();

        assert!(matches!(err, ClearScrapeError::InvalidOptions(_)));
        assert!(client.transport().urls().is_empty());
    }

    #[tokio::test]
    async fn test_get_text_defaults_to_empty() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({ "data": { "html": "<p/>" } }));

        let text = client(transport).get_text("https://example.com").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_get_html() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({ "data": { "html": "<p>x</p>", "text": "x" } }));

        let html = client(transport).get_html("https://example.com").await.unwrap();
        assert_eq!(html, "<p>x</p>");
    }

    #[tokio::test]
    async fn test_screenshot_decodes_data_url() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({ "data": { "html": "", "screenshot": "data:image/png;base64,iVBORw0KGgo=" } }),
        );

        let client = client(transport);
        let bytes = client
            .screenshot("https://example.com", Some("#hero"))
            .await
            .unwrap();

        assert_eq!(bytes, [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
        assert_eq!(
            client.transport().payloads(),
            [json!({
                "url": "https://example.com",
                "js_render": true,
                "screenshot": true,
                "screenshot_selector": "#hero",
            })]
        );
    }

    #[tokio::test]
    async fn test_screenshot_missing() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({ "data": { "html": "" } }));

        let err = client(transport)
            .screenshot("https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClearScrapeError::MissingScreenshot));
    }

    #[tokio::test]
    async fn test_extract_returns_mapping() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({ "data": { "extracted": { "title": "Echo Dot", "price": 49.99 } } }),
        );

        let client = client(transport);
        let data = client
            .extract("https://www.amazon.com/dp/B09V3KXJPB", Domain::Amazon)
            .await
            .unwrap();

        assert_eq!(data["title"], "Echo Dot");
        assert_eq!(client.transport().payloads()[0]["domain"], "amazon");
    }

    #[tokio::test]
    async fn test_extract_null_is_missing_and_not_retried() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({ "data": { "extracted": null } }));

        let client = client(transport);
        let err = client
            .extract("https://www.ebay.com/itm/1", Domain::Ebay)
            .await
            .unwrap_err();

        assert!(matches!(err, ClearScrapeError::MissingExtractedData));
        assert_eq!(client.transport().urls().len(), 1);
        assert!(client.transport().sleeps().is_empty());
    }

    #[test]
    fn test_proxy_helpers() {
        let client = client(MockTransport::new());

        let proxy = client.get_proxy_config(Some("us"), Some("abc"));
        assert_eq!(proxy.username, "K-country-us-session-abc");
        assert_eq!(
            client.get_proxy_url(Some("us"), Some("abc")),
            "http://K-country-us-session-abc:K@proxy.clearscrape.io:8000"
        );
        assert_eq!(
            client.get_browser_ws_url(None),
            "wss://browser.clearscrape.io?apiKey=K"
        );
    }

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_screenshot("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_screenshot("aGVs\nbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode_screenshot("not base64!"),
            Err(ClearScrapeError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_data_url_without_payload() {
        assert!(matches!(
            decode_screenshot("data:image/png;base64"),
            Err(ClearScrapeError::MissingScreenshot)
        ));
        assert!(matches!(
            decode_screenshot("data:image/png;base64,  "),
            Err(ClearScrapeError::MissingScreenshot)
        ));
    }

    #[tokio::test]
    async fn test_screenshot_data_url_without_payload_is_missing() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({ "data": { "html": "", "screenshot": "data:image/png;base64" } }),
        );

        let err = client(transport)
            .screenshot("https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClearScrapeError::MissingScreenshot));
    }
}
