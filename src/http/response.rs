//! HTTP response building module
//!
//! Turns responder decisions into hyper responses and provides builders for
//! the fixed status responses.

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::{empty, full, ResponseBody};
use crate::handler::{BodySource, ResponseDecision};

/// Render a responder decision
///
/// File bodies are streamed in reads of at most `chunk_size` bytes; the
/// handle is closed when the body finishes or is dropped on disconnect.
pub fn render_decision(decision: ResponseDecision, chunk_size: usize) -> Response<ResponseBody> {
    match decision {
        ResponseDecision::MethodNotAllowed => build_405_response(),
        ResponseDecision::Redirect { location } => {
            build_redirect_response(&location, StatusCode::MOVED_PERMANENTLY)
        }
        ResponseDecision::NotFound => build_404_response(),
        ResponseDecision::NotModified { headers } => build_304_response(headers),
        ResponseDecision::Ok { headers, body } => {
            let body = match body {
                BodySource::Empty => empty(),
                BodySource::File(file) => stream_file(file, chunk_size),
            };
            with_headers(StatusCode::OK, headers, body)
        }
    }
}

fn stream_file(file: File, chunk_size: usize) -> ResponseBody {
    let chunks = ReaderStream::with_capacity(file, chunk_size);
    StreamBody::new(chunks.map_ok(Frame::data)).boxed_unsync()
}

fn with_headers(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Build 304 Not Modified response carrying the validator headers
pub fn build_304_response(headers: HeaderMap) -> Response<ResponseBody> {
    with_headers(StatusCode::NOT_MODIFIED, headers, empty())
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(full("404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            internal_error()
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::ALLOW, "GET, HEAD")
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            internal_error()
        })
}

/// Build a redirect response with the given status code
pub fn build_redirect_response(target: &str, status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(header::LOCATION, target)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(full("Redirecting..."))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            internal_error()
        })
}

/// Build a fixed response; HEAD requests get the headers without the body
pub fn build_direct_response(
    status: StatusCode,
    body: Option<&str>,
    content_type: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let content = body.unwrap_or_default().to_string();
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_LENGTH, content.len());
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let body = if is_head { empty() } else { full(content) };
    builder.body(body).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        internal_error()
    })
}

/// Stamp the `Server` header on an outgoing response
pub fn set_server_header(response: &mut Response<ResponseBody>, value: &HeaderValue) {
    response.headers_mut().insert(header::SERVER, value.clone());
}

fn internal_error() -> Response<ResponseBody> {
    let mut response = Response::new(empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
