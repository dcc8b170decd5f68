//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling.

use std::time::{SystemTime, UNIX_EPOCH};

use httpdate::{fmt_http_date, parse_http_date};

/// Generate a strong `ETag` from file size and modification time
///
/// The tag is stable while the file is untouched and changes whenever its
/// size or mtime (down to the nanosecond) changes.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"a-65f1c2d0-1dcd6500"`
pub fn generate_etag(size: u64, modified: SystemTime) -> String {
    let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
    format!(
        "\"{size:x}-{:x}-{:x}\"",
        since_epoch.as_secs(),
        since_epoch.subsec_nanos()
    )
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
/// - Weak validators: `W/"abc123"` compares equal to `"abc123"`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: &str, etag: &str) -> bool {
    let etag = strip_weak(etag);
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || strip_weak(candidate) == etag)
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Check whether an `If-Modified-Since` value covers the file's mtime
///
/// HTTP dates carry whole seconds, so the comparison truncates the mtime
/// first. A header that does not parse as an HTTP-date never matches.
pub fn not_modified_since(if_modified_since: &str, last_modified: SystemTime) -> bool {
    parse_http_date(if_modified_since.trim())
        .is_ok_and(|since| epoch_secs(since) >= epoch_secs(last_modified))
}

fn epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Format a timestamp as an RFC 7231 HTTP-date
pub fn format_http_date(time: SystemTime) -> String {
    fmt_http_date(time)
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Revalidate on every use
    NoCache,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}
