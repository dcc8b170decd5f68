//! Production static responder
//!
//! Serves files below a mount's root directory with directory redirects,
//! index files, precompressed gzip variants and conditional GET. Every
//! filesystem failure becomes a `NotFound` decision; nothing here returns
//! an error to the caller.

use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs::{self, File};

use super::decision::{BodySource, ResponseDecision};
use super::request::StaticRequest;
use super::resolve::{resolve_under_root, ResolveError};
use crate::http::cache::{self, CachePolicy};
use crate::http::headers::HeaderBuilder;
use crate::http::mime;
use crate::logger;

/// Serve `request` from `root_dir`, using `index_filename` for directories
pub async fn handle(request: &StaticRequest, root_dir: &Path, index_filename: &str) -> ResponseDecision {
    Responder::new(root_dir, index_filename).handle(request).await
}

#[derive(Debug, Clone)]
pub struct Responder {
    root_dir: PathBuf,
    index_file: String,
    cache_policy: Option<CachePolicy>,
}

impl Responder {
    pub fn new(root_dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            index_file: index_file.into(),
            cache_policy: None,
        }
    }

    /// Attach a `Cache-Control` header to 200 and 304 responses
    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = Some(policy);
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub async fn handle(&self, request: &StaticRequest) -> ResponseDecision {
        if !request.is_get_or_head() {
            return ResponseDecision::MethodNotAllowed;
        }

        let Some(mut target) = resolve_logged(&self.root_dir, request) else {
            return ResponseDecision::NotFound;
        };

        match fs::metadata(&target).await {
            Ok(meta) if meta.is_dir() => {
                if !request.path.ends_with('/') {
                    return ResponseDecision::Redirect {
                        location: request.redirect_location(),
                    };
                }
                target.push(&self.index_file);
            }
            // A file addressed as a directory
            Ok(_) if request.path.ends_with('/') => return ResponseDecision::NotFound,
            Ok(_) => {}
            Err(_) => return ResponseDecision::NotFound,
        }

        // Type of the requested resource, not of its .gz variant
        let content_type = mime::get_content_type(&target);

        let mut gzip_selected = false;
        if request.accepts_gzip() {
            let variant = gzip_variant(&target);
            if is_regular_file(&variant).await {
                target = variant;
                gzip_selected = true;
            }
        }

        let Some(opened) = open_regular_file(&target).await else {
            return ResponseDecision::NotFound;
        };

        let etag = cache::generate_etag(opened.meta.len(), opened.modified);
        let last_modified = cache::format_http_date(opened.modified);

        let mut headers = HeaderBuilder::new();
        headers
            .date_now()
            .last_modified(&last_modified)
            .etag(&etag);
        if gzip_selected {
            headers.vary_encoding();
        }
        if let Some(policy) = self.cache_policy {
            headers.cache_control(policy);
        }

        if is_not_modified(request, opened.modified, Some(etag.as_str())) {
            return ResponseDecision::NotModified {
                headers: headers.build(),
            };
        }

        headers
            .content_type(&content_type)
            .content_length(opened.meta.len());
        if gzip_selected {
            headers.gzip_encoding();
        }

        ResponseDecision::Ok {
            headers: headers.build(),
            body: opened.into_body(request.is_head()),
        }
    }
}

/// A regular file opened for reading, with the metadata of that handle
pub(crate) struct OpenedFile {
    pub file: File,
    pub meta: Metadata,
    pub modified: SystemTime,
}

impl OpenedFile {
    /// HEAD drops the handle straight away
    pub fn into_body(self, is_head: bool) -> BodySource {
        if is_head {
            BodySource::Empty
        } else {
            BodySource::File(self.file)
        }
    }
}

/// Open `path` and stat the handle, so the validators describe exactly the
/// bytes that will be streamed
pub(crate) async fn open_regular_file(path: &Path) -> Option<OpenedFile> {
    let file = File::open(path).await.ok()?;
    let meta = file.metadata().await.ok()?;
    if !meta.is_file() {
        return None;
    }
    let modified = meta.modified().ok()?;
    Some(OpenedFile {
        file,
        meta,
        modified,
    })
}

/// Resolve the request path below `root`, logging traversal attempts
pub(crate) fn resolve_logged(root: &Path, request: &StaticRequest) -> Option<PathBuf> {
    match resolve_under_root(root, &request.path) {
        Ok(path) => Some(path),
        Err(ResolveError::Escape) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {}{}",
                request.mount_prefix, request.path
            ));
            None
        }
        Err(ResolveError::BadPath) => None,
    }
}

/// `If-Modified-Since` first, then `If-None-Match`
pub(crate) fn is_not_modified(request: &StaticRequest, modified: SystemTime, etag: Option<&str>) -> bool {
    if request
        .if_modified_since
        .as_deref()
        .is_some_and(|since| cache::not_modified_since(since, modified))
    {
        return true;
    }
    match (request.if_none_match.as_deref(), etag) {
        (Some(if_none_match), Some(etag)) => cache::check_etag_match(if_none_match, etag),
        _ => false,
    }
}

fn gzip_variant(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".gz");
    PathBuf::from(name)
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}
