//! Response mapping.
//!
//! The service wraps results as
//! `{ "success": .., "credits_used": .., "data": { "html": .., ... } }`.
//! Every field is optional on the wire; absent or `null` values map to the
//! defaults of [`ScrapeResponse`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Credits charged when the service does not report a count.
const DEFAULT_CREDITS_USED: u64 = 1;

// ============================================================================
// Wire Types
// ============================================================================

// Fields with an unexpected type read as absent.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default, deserialize_with = "lenient")]
    success: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    credits_used: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    data: Option<WireData>,
}

#[derive(Debug, Default, Deserialize)]
struct WireData {
    #[serde(default, deserialize_with = "lenient")]
    html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    screenshot: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    extracted: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient")]
    metadata: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    status_code: Option<u16>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ============================================================================
// Scrape Response
// ============================================================================

/// Result of a scrape request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    /// Whether the service reported success.
    pub success: bool,
    /// Page HTML, empty when the service sent none.
    pub html: String,
    /// Extracted page text.
    pub text: Option<String>,
    /// Base64 screenshot, possibly with a `data:` URL prefix.
    pub screenshot: Option<String>,
    /// Domain-specific structured fields.
    pub extracted: Option<Map<String, Value>>,
    /// Response metadata.
    pub metadata: Option<Map<String, Value>>,
    /// Credits charged for the request.
    pub credits_used: u64,
    /// Final URL after redirects.
    pub url: Option<String>,
    /// Status code returned by the target site.
    pub status_code: Option<u16>,
}

impl ScrapeResponse {
    /// Maps a decoded response body.
    ///
    /// Missing, `null` or wrongly typed fields fall back to their defaults.
    /// Only a body that is not a JSON object is rejected.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::InvalidData(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        let wire: WireResponse = serde_json::from_value(value)?;
        let data = wire.data.unwrap_or_default();

        Ok(Self {
            success: wire.success.unwrap_or(true),
            html: data.html.unwrap_or_default(),
            text: data.text,
            screenshot: data.screenshot,
            extracted: data.extracted,
            metadata: data.metadata,
            credits_used: wire.credits_used.unwrap_or(DEFAULT_CREDITS_USED),
            url: data.url,
            status_code: data.status_code,
        })
    }

    /// Returns true if a non-empty screenshot was returned.
    pub fn has_screenshot(&self) -> bool {
        self.screenshot.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns true if a non-empty extracted mapping was returned.
    pub fn has_extracted(&self) -> bool {
        self.extracted.as_ref().is_some_and(|m| !m.is_empty())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_response() {
        let response = ScrapeResponse::from_value(json!({
            "success": true,
            "credits_used": 6,
            "data": {
                "html": "<html></html>",
                "text": "hello",
                "screenshot": "aGk=",
                "extracted": { "title": "Widget" },
                "metadata": { "took_ms": 812 },
                "url": "https://example.com/",
                "status_code": 200
            }
        }))
        .unwrap();

        assert!(response.success);
        assert_eq!(response.html, "<html></html>");
        assert_eq!(response.text.as_deref(), Some("hello"));
        assert_eq!(response.credits_used, 6);
        assert_eq!(response.extracted.unwrap()["title"], "Widget");
        assert_eq!(response.metadata.unwrap()["took_ms"], 812);
        assert_eq!(response.url.as_deref(), Some("https://example.com/"));
        assert_eq!(response.status_code, Some(200));
    }

    #[test]
    fn test_missing_data_uses_defaults() {
        let response = ScrapeResponse::from_value(json!({})).unwrap();

        assert!(response.success);
        assert_eq!(response.html, "");
        assert!(response.text.is_none());
        assert!(response.screenshot.is_none());
        assert!(response.extracted.is_none());
        assert!(response.metadata.is_none());
        assert_eq!(response.credits_used, 1);
        assert!(response.url.is_none());
        assert!(response.status_code.is_none());
    }

    #[test]
    fn test_success_false_without_data() {
        let response = ScrapeResponse::from_value(json!({ "success": false })).unwrap();
        assert!(!response.success);
        assert_eq!(response.html, "");
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let response = ScrapeResponse::from_value(json!({
            "success": null,
            "credits_used": null,
            "data": { "html": null, "extracted": null }
        }))
        .unwrap();

        assert!(response.success);
        assert_eq!(response.html, "");
        assert_eq!(response.credits_used, 1);
        assert!(!response.has_extracted());
    }

    #[test]
    fn test_wrong_typed_fields_keep_html() {
        let response = ScrapeResponse::from_value(json!({
            "success": "true",
            "credits_used": 1.5,
            "data": {
                "html": "<p/>",
                "metadata": "n/a",
                "extracted": ["a", "b"],
                "status_code": "200",
                "url": 42
            }
        }))
        .unwrap();

        assert!(response.success);
        assert_eq!(response.html, "<p/>");
        assert_eq!(response.credits_used, 1);
        assert!(response.metadata.is_none());
        assert!(response.extracted.is_none());
        assert!(response.status_code.is_none());
        assert!(response.url.is_none());
    }

    #[test]
    fn test_non_object_data_uses_defaults() {
        let response =
            ScrapeResponse::from_value(json!({ "success": false, "data": "oops" })).unwrap();
        assert!(!response.success);
        assert_eq!(response.html, "");
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ScrapeResponse::from_value(json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidData(_)));
    }

    #[test]
    fn test_empty_payloads_count_as_absent() {
        let response = ScrapeResponse::from_value(json!({
            "data": { "screenshot": "", "extracted": {} }
        }))
        .unwrap();

        assert!(!response.has_screenshot());
        assert!(!response.has_extracted());
    }
}
