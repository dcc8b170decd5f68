use hyper::header::HeaderMap;
use hyper::StatusCode;
use tokio::fs::File;

/// Outcome of serving one static request
///
/// Exactly one decision is produced per request.
#[derive(Debug)]
pub enum ResponseDecision {
    /// Method other than GET or HEAD
    MethodNotAllowed,
    /// Directory requested without its trailing slash
    Redirect { location: String },
    NotFound,
    /// Conditional request satisfied; carries the validator headers
    NotModified { headers: HeaderMap },
    Ok { headers: HeaderMap, body: BodySource },
}

impl ResponseDecision {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Redirect { .. } => StatusCode::MOVED_PERMANENTLY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotModified { .. } => StatusCode::NOT_MODIFIED,
            Self::Ok { .. } => StatusCode::OK,
        }
    }

    /// Headers attached to the decision, if any
    pub const fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::NotModified { headers } | Self::Ok { headers, .. } => Some(headers),
            _ => None,
        }
    }
}

/// Where the body of a 200 response comes from
#[derive(Debug)]
pub enum BodySource {
    /// HEAD requests
    Empty,
    /// Opened file, streamed lazily when the response is written
    File(File),
}
