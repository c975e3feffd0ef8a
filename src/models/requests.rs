//! Request models for the proxy API
//!
//! Lookups carry their key out of band, in a request header, never in the
//! body.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::error::ProxyError;

/// Header holding the requested key.
pub const KEY_HEADER: &str = "key";

/// Key extracted from the `key` request header.
///
/// A missing header, or one that is not valid UTF-8, yields the empty key,
/// which the cache treats as permanently absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHeader(pub String);

impl KeyHeader {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let key = headers
            .get(KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for KeyHeader
where
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_key_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(KEY_HEADER, HeaderValue::from_static("k1"));

        assert_eq!(KeyHeader::from_headers(&headers).as_str(), "k1");
    }

    #[test]
    fn test_missing_header_is_empty_key() {
        let key = KeyHeader::from_headers(&HeaderMap::new());
        assert!(key.is_empty());
    }

    #[test]
    fn test_non_utf8_header_is_empty_key() {
        let mut headers = HeaderMap::new();
        headers.insert(KEY_HEADER, HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());

        assert!(KeyHeader::from_headers(&headers).is_empty());
    }
}
