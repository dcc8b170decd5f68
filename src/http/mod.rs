//! HTTP protocol layer module
//!
//! Validators, content types, header assembly and response rendering,
//! decoupled from the request routing that uses them.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;

/// Body type of every response the server produces
///
/// File bodies are streamed from disk and can fail mid-way, hence the
/// `io::Error` error type.
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Body holding the given bytes
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no content
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_direct_response,
    build_redirect_response, render_decision,
};
