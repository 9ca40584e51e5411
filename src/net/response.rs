//! Buffered HTTP response model.
//!
//! This struct represents a **fully buffered** HTTP response returned by a
//! [`Transport`](crate::net::Transport). It contains the URL the request was
//! sent to, status code + reason, response headers, and the raw body bytes.
//!
//! ## Notes
//! - The body is stored as raw `Vec<u8>`. For text responses, use
//!   [`Response::text`]. For JSON, use [`Response::json`].
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names and stores them lower-cased.
//! - Redirects are never followed, so `url` is always the requested URL.
//!
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::ClientError;

/// Simple structure for HTTP responses.
///
/// All fields reflect the **received** response as-is; no additional parsing
/// or transformation is performed by this type.
#[derive(Debug, Clone)]
pub struct Response {
    /// URL the request was sent to.
    pub url: url::Url,

    /// HTTP status code.
    pub status: StatusCode,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    ///
    /// `"Unknown"` for non-standard codes.
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(url: url::Url, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            body,
        }
    }

    /// Status code in string form, e.g. `"200"`.
    pub fn code(&self) -> &str {
        self.status.as_str()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(status: u16, body: &[u8]) -> Response {
        Response::new(
            url::Url::parse("http://example.test/").unwrap(),
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.to_vec(),
        )
    }

    #[test]
    fn code_and_reason() {
        let resp = response(404, b"");
        assert_eq!(resp.code(), "404");
        assert_eq!(resp.status_text, "Not Found");
        assert!(!resp.is_success());
    }

    #[test]
    fn non_standard_code_has_unknown_reason() {
        let resp = response(599, b"");
        assert_eq!(resp.status_text, "Unknown");
    }

    #[test]
    fn json_body() {
        #[derive(Deserialize)]
        struct Payload {
            name: String,
        }

        let resp = response(200, br#"{"name":"sport"}"#);
        let payload: Payload = resp.json().unwrap();
        assert_eq!(payload.name, "sport");
        assert_eq!(resp.text(), r#"{"name":"sport"}"#);
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let resp = response(200, b"abc");
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
