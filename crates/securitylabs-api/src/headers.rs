//! Fixed request header profile
//!
//! Every request carries the same four headers; only `Host` follows the
//! configured base URL. The profile also records a
//! Content-Length derived from the JSON encoding of those headers: the
//! service's clients have always computed it that way. The value is kept for
//! inspection only; message framing on the wire is left to the transport,
//! which sizes each request from its actual body.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::constants;
use crate::error::{Error, Result};

/// Header name/value pairs sent with every request, apart from `Host`.
const COMMON_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("User-Agent", constants::USER_AGENT),
    ("Accept", "*/*"),
];

/// Prepared headers shared by every request of the process.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    headers: HeaderMap,
    content_length: usize,
}

impl HeaderProfile {
    /// Build the profile for the production host.
    ///
    /// Fails only if the header set cannot be serialized, which means the
    /// constants are broken. Callers should abort startup on error.
    pub fn new() -> Result<Self> {
        Self::for_host(constants::API_HOST)
    }

    /// Build the profile with `Host` taken from `base_url` (host, plus the
    /// port when it is not the scheme's default).
    pub fn for_base_url(base_url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidBaseUrl(format!("{base_url}: no host")))?;
        match url.port() {
            Some(port) => Self::for_host(&format!("{host}:{port}")),
            None => Self::for_host(host),
        }
    }

    fn for_host(host: &str) -> Result<Self> {
        let mut payload = BTreeMap::new();
        for &(name, value) in COMMON_HEADERS {
            payload.insert(name, value);
        }
        payload.insert("Host", host);
        let serialized = serde_json::to_vec(&payload)
            .map_err(|e| Error::HeaderSerialization(e.to_string()))?;

        let mut headers = HeaderMap::with_capacity(payload.len());
        for (name, value) in &payload {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::HeaderSerialization(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::HeaderSerialization(format!("{name}: {e}")))?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            headers,
            content_length: serialized.len(),
        })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Length in bytes of the serialized common headers.
    pub fn content_length(&self) -> usize {
        self.content_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};

    #[test]
    fn profile_contains_fixed_headers() {
        let profile = HeaderProfile::new().unwrap();
        let headers = profile.headers();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], "PostmanRuntime/7.29.0");
        assert_eq!(headers[HOST], "node.securitylabs.xyz");
        assert_eq!(headers[ACCEPT], "*/*");
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn content_length_matches_serialized_header_payload() {
        // {"Accept":"*/*","Content-Type":"application/json","Host":"node.securitylabs.xyz","User-Agent":"PostmanRuntime/7.29.0"}
        let expected = concat!(
            r#"{"Accept":"*/*","Content-Type":"application/json","#,
            r#""Host":"node.securitylabs.xyz","User-Agent":"PostmanRuntime/7.29.0"}"#
        );
        let profile = HeaderProfile::new().unwrap();
        assert_eq!(profile.content_length(), expected.len());
        assert_eq!(profile.content_length(), 118);
    }

    #[test]
    fn profile_does_not_put_content_length_on_the_wire() {
        let profile = HeaderProfile::new().unwrap();
        assert!(!profile.headers().contains_key(CONTENT_LENGTH));
    }

    #[test]
    fn default_base_url_matches_fixed_profile() {
        let profile = HeaderProfile::for_base_url(crate::constants::BASE_URL).unwrap();
        assert_eq!(profile.headers()[HOST], "node.securitylabs.xyz");
        assert_eq!(profile.content_length(), 118);
    }

    #[test]
    fn host_follows_overridden_base_url() {
        let profile = HeaderProfile::for_base_url("http://127.0.0.1:9000").unwrap();
        assert_eq!(profile.headers()[HOST], "127.0.0.1:9000");
        assert_eq!(profile.headers()[USER_AGENT], "PostmanRuntime/7.29.0");

        let profile = HeaderProfile::for_base_url("https://staging.example.com/").unwrap();
        assert_eq!(profile.headers()[HOST], "staging.example.com");
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let err = HeaderProfile::for_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl(_)), "got {err:?}");
    }
}
