//! Lunar data client
//!
//! Builds the `/lunar-data` request, sends it through a `Transport` and
//! turns the reply into either a validated snapshot or a `FetchError`.

use crate::model::LunarSnapshot;
use anyhow::Result;
use thiserror::Error;

/// Location used when the input field is blank
pub const DEFAULT_LOCATION: &str = "Los Angeles, CA";

/// Status code and body of an HTTP reply
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET request
///
/// The HTTP implementation is used at runtime; tests swap in a stub.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpReply>;
}

/// Blocking reqwest transport, meant to be called off the UI thread
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        // The data request has no timeout of its own
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("lunar-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpReply> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpReply { status, body })
    }
}

/// Why a fetch did not produce a snapshot
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx reply, with the server's `detail` message when it sent one
    #[error("{}", status_message(.code, .detail))]
    Status { code: u16, detail: Option<String> },
    /// The request never produced a reply
    #[error("{0}")]
    Transport(String),
    /// The body was not the expected JSON shape
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    /// The body decoded but holds values that cannot be displayed
    #[error("invalid lunar data: {0}")]
    Invalid(String),
}

fn status_message(code: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("HTTP error! status: {}", code),
    }
}

impl FetchError {
    /// Text for the error banner
    pub fn banner(&self) -> String {
        format!("Failed to fetch lunar data: {}", self)
    }
}

/// A decoded snapshot together with the JSON it was decoded from
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    pub data: LunarSnapshot,
    pub raw: serde_json::Value,
}

/// Trimmed input, or the default location when the input is blank
pub fn resolve_location(input: &str, default: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `{base_url}/lunar-data?location=<encoded>`
pub fn build_request_url(base_url: &str, location: &str) -> Result<String, FetchError> {
    let endpoint = format!("{}/lunar-data", base_url.trim_end_matches('/'));
    reqwest::Url::parse_with_params(&endpoint, &[("location", location)])
        .map(|url| url.to_string())
        .map_err(|e| FetchError::Transport(format!("invalid URL '{}': {}", endpoint, e)))
}

/// Pull a usable `detail` message out of an error body
///
/// Strings are used as-is (empty ones are ignored); structured details are
/// shown as compact JSON. Anything unparseable yields `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Fetch and validate the snapshot for `location`
pub fn fetch_snapshot(
    transport: &dyn Transport,
    base_url: &str,
    location: &str,
) -> Result<FetchedPayload, FetchError> {
    let url = build_request_url(base_url, location)?;

    let reply = transport
        .get(&url)
        .map_err(|e| FetchError::Transport(format!("{:#}", e)))?;

    if !reply.is_success() {
        return Err(FetchError::Status {
            code: reply.status,
            detail: extract_detail(&reply.body),
        });
    }

    let raw: serde_json::Value = serde_json::from_str(&reply.body)?;
    let data: LunarSnapshot = serde_json::from_value(raw.clone())?;
    data.validate().map_err(FetchError::Invalid)?;

    Ok(FetchedPayload { data, raw })
}


#[cfg(test)]
mod tests {
    use super::stub::StubTransport;
    use super::*;
    use crate::model::snapshot::fixtures::SAMPLE_JSON;

    const BASE: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_resolve_location_blank_uses_default() {
        assert_eq!(resolve_location("", DEFAULT_LOCATION), "Los Angeles, CA");
        assert_eq!(resolve_location("   \t", DEFAULT_LOCATION), "Los Angeles, CA");
        assert_eq!(resolve_location("  Tokyo ", DEFAULT_LOCATION), "Tokyo");
    }

    #[test]
    fn test_build_request_url_encodes_location() {
        let url = build_request_url(BASE, "Los Angeles, CA").unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:8000/lunar-data?location=Los+Angeles%2C+CA"
        );

        let url = build_request_url("http://example.com/api/", "São Paulo & Co").unwrap();
        assert_eq!(
            url,
            "http://example.com/api/lunar-data?location=S%C3%A3o+Paulo+%26+Co"
        );
    }

    #[test]
    fn test_build_request_url_rejects_bad_base() {
        let err = build_request_url("not a url", "Paris").unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_extract_detail_variants() {
        assert_eq!(
            extract_detail(r#"{"detail":"not found"}"#).as_deref(),
            Some("not found")
        );
        assert_eq!(extract_detail(r#"{"detail":""}"#), None);
        assert_eq!(extract_detail(r#"{"detail":null}"#), None);
        assert_eq!(extract_detail(r#"{"error":"x"}"#), None);
        assert_eq!(extract_detail("<html>oops</html>"), None);
        assert_eq!(
            extract_detail(r#"{"detail":[{"msg":"bad"}]}"#).as_deref(),
            Some(r#"[{"msg":"bad"}]"#)
        );
    }

    #[test]
    fn test_fetch_success() {
        let transport = StubTransport::reply(200, SAMPLE_JSON);
        let payload = fetch_snapshot(&transport, BASE, "Los Angeles, CA").unwrap();
        assert_eq!(payload.data.phase.name, "Waxing Gibbous");
        assert_eq!(payload.raw["phase"]["emoji"], "🌔");
        assert_eq!(transport.requested_urls().len(), 1);
    }

    #[test]
    fn test_fetch_404_with_detail() {
        let transport = StubTransport::reply(404, r#"{"detail":"not found"}"#);
        let err = fetch_snapshot(&transport, BASE, "Atlantis").unwrap_err();
        assert_eq!(err.banner(), "Failed to fetch lunar data: not found");
    }

    #[test]
    fn test_fetch_500_without_detail() {
        let transport = StubTransport::reply(500, "Internal Server Error");
        let err = fetch_snapshot(&transport, BASE, "Paris").unwrap_err();
        assert_eq!(
            err.banner(),
            "Failed to fetch lunar data: HTTP error! status: 500"
        );
    }

    #[test]
    fn test_fetch_transport_error_is_verbatim() {
        let transport = StubTransport::failing("connection refused");
        let err = fetch_snapshot(&transport, BASE, "Paris").unwrap_err();
        assert_eq!(err.banner(), "Failed to fetch lunar data: connection refused");
    }

    #[test]
    fn test_fetch_malformed_payload_is_surfaced() {
        let transport = StubTransport::reply(200, r#"{"phase": {"name": "Full Moon"}}"#);
        let err = fetch_snapshot(&transport, BASE, "Paris").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.banner().starts_with("Failed to fetch lunar data: "));
    }

    #[test]
    fn test_fetch_invalid_values_are_rejected() {
        let body = SAMPLE_JSON.replace("\"illumination\": 78.4", "\"illumination\": 178.4");
        let transport = StubTransport::reply(200, &body);
        let err = fetch_snapshot(&transport, BASE, "Paris").unwrap_err();
        assert!(matches!(err, FetchError::Invalid(_)));
    }
}
