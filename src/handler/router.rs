//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: picks the mount that owns the
//! path, falls back to the upstream handler otherwise, and writes the
//! access log.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body;
use hyper::header::{self, HeaderMap};
use hyper::{Request, Response, Version};

use super::request::StaticRequest;
use crate::config::AppState;
use crate::http::response::set_server_header;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
///
/// Request bodies are never read; static serving only looks at the request
/// line and headers.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let request = StaticRequest::from_parts(req.method(), req.uri(), req.headers());

    let mount = state.find_mount(&request.path);
    let mut response = match mount {
        Some(mount) => {
            let decision = mount.serve(&request).await;
            http::render_decision(decision, state.config.performance.chunk_size)
        }
        None => state.upstream.respond(&request),
    };
    set_server_header(&mut response, &state.server_header);

    let logging = &state.config.logging;
    if logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            request.method.to_string(),
            request.path.clone(),
        );
        entry.query = request.query.clone();
        entry.http_version = version_str(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if request.is_head() {
            0
        } else {
            body_len(&response)
        };
        entry.referer = header_string(req.headers(), header::REFERER);
        entry.user_agent = header_string(req.headers(), header::USER_AGENT);
        entry.mount = mount.map(|m| m.name().to_string());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

/// Bytes the response body will carry
fn body_len(response: &Response<ResponseBody>) -> u64 {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| response.body().size_hint().exact())
        .unwrap_or(0)
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_str() {
        assert_eq!(version_str(Version::HTTP_10), "1.0");
        assert_eq!(version_str(Version::HTTP_11), "1.1");
        assert_eq!(version_str(Version::HTTP_2), "2");
    }

    #[test]
    fn test_body_len_prefers_content_length() {
        let mut response = http::build_direct_response(
            hyper::StatusCode::OK,
            Some("hello"),
            None,
            false,
        );
        assert_eq!(body_len(&response), 5);

        response.headers_mut().remove(header::CONTENT_LENGTH);
        assert_eq!(body_len(&response), 5);

        assert_eq!(body_len(&http::build_404_response()), 13);
    }
}
