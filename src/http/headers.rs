//! Response header assembly
//!
//! Collects the validator and content headers of file responses in one
//! place so the production and debug responders emit them identically.

use std::time::SystemTime;

use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};

use super::cache::{format_http_date, CachePolicy};

#[derive(Debug, Default)]
pub struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, or removes it if `value` is not a valid header value
    pub fn insert(&mut self, name: HeaderName, value: &str) -> &mut Self {
        match HeaderValue::from_str(value) {
            Ok(value) if !value.is_empty() => {
                self.headers.insert(name, value);
            }
            _ => {
                self.headers.remove(name);
            }
        }
        self
    }

    /// `Date` set to the current time
    pub fn date_now(&mut self) -> &mut Self {
        self.insert(header::DATE, &format_http_date(SystemTime::now()))
    }

    pub fn last_modified(&mut self, value: &str) -> &mut Self {
        self.insert(header::LAST_MODIFIED, value)
    }

    pub fn etag(&mut self, value: &str) -> &mut Self {
        self.insert(header::ETAG, value)
    }

    pub fn content_type(&mut self, value: &str) -> &mut Self {
        self.insert(header::CONTENT_TYPE, value)
    }

    pub fn content_length(&mut self, len: u64) -> &mut Self {
        self.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        self
    }

    /// `Content-Encoding: gzip` for a precompressed variant
    pub fn gzip_encoding(&mut self) -> &mut Self {
        self.headers
            .insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        self
    }

    /// `Vary: Accept-Encoding`, required whenever the body depends on it
    pub fn vary_encoding(&mut self) -> &mut Self {
        self.headers
            .insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        self
    }

    pub fn cache_control(&mut self, policy: CachePolicy) -> &mut Self {
        self.insert(header::CACHE_CONTROL, &policy.to_header_value())
    }

    pub fn build(&mut self) -> HeaderMap {
        std::mem::take(&mut self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_validator_headers() {
        let headers = HeaderBuilder::new()
            .date_now()
            .last_modified("Tue, 14 Nov 2023 22:13:20 GMT")
            .etag("\"a-1-0\"")
            .build();

        assert!(headers.contains_key(header::DATE));
        assert_eq!(headers[header::ETAG], "\"a-1-0\"");
        assert_eq!(
            headers[header::LAST_MODIFIED],
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
    }

    #[test]
    fn test_gzip_headers() {
        let headers = HeaderBuilder::new()
            .content_length(6)
            .gzip_encoding()
            .vary_encoding()
            .build();

        assert_eq!(headers[header::CONTENT_LENGTH], "6");
        assert_eq!(headers[header::CONTENT_ENCODING], "gzip");
        assert_eq!(headers[header::VARY], "Accept-Encoding");
    }

    #[test]
    fn test_invalid_value_removes_header() {
        let headers = HeaderBuilder::new()
            .content_type("text/plain")
            .content_type("bad\nvalue")
            .build();

        assert!(!headers.contains_key(header::CONTENT_TYPE));
    }

    #[test]
    fn test_cache_control() {
        let headers = HeaderBuilder::new()
            .cache_control(CachePolicy::NoCache)
            .build();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    }
}
