//! Development responder
//!
//! Serves files straight from the source directories while developing:
//! each finder directory is searched before the mount root, nothing is
//! cached by clients, and precompressed variants are ignored.

use std::path::{Path, PathBuf};

use super::decision::ResponseDecision;
use super::request::StaticRequest;
use super::resolve::{resolve_under_root, ResolveError};
use super::responder::{is_not_modified, open_regular_file, OpenedFile};
use crate::http::cache::{self, CachePolicy};
use crate::http::headers::HeaderBuilder;
use crate::http::mime;
use crate::logger;

#[derive(Debug, Clone)]
pub struct DebugResponder {
    root_dir: PathBuf,
    finder_dirs: Vec<PathBuf>,
}

impl DebugResponder {
    pub fn new(root_dir: impl Into<PathBuf>, finder_dirs: Vec<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            finder_dirs,
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Finder directories in search order, then the root
    fn search_dirs(&self) -> impl Iterator<Item = &Path> {
        self.finder_dirs
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(self.root_dir.as_path()))
    }

    pub async fn handle(&self, request: &StaticRequest) -> ResponseDecision {
        if !request.is_get_or_head() {
            return ResponseDecision::MethodNotAllowed;
        }

        let Some((path, opened)) = self.find(request).await else {
            return ResponseDecision::NotFound;
        };

        let last_modified = cache::format_http_date(opened.modified);
        let mut headers = HeaderBuilder::new();
        headers
            .date_now()
            .last_modified(&last_modified)
            .cache_control(CachePolicy::NoCache);

        if is_not_modified(request, opened.modified, None) {
            return ResponseDecision::NotModified {
                headers: headers.build(),
            };
        }

        headers
            .content_type(&mime::get_content_type(&path))
            .content_length(opened.meta.len());

        ResponseDecision::Ok {
            headers: headers.build(),
            body: opened.into_body(request.is_head()),
        }
    }

    /// First regular file matching the request across the search dirs
    async fn find(&self, request: &StaticRequest) -> Option<(PathBuf, OpenedFile)> {
        if request.path.ends_with('/') {
            return None;
        }
        for dir in self.search_dirs() {
            let candidate = match resolve_under_root(dir, &request.path) {
                Ok(path) => path,
                Err(ResolveError::Escape) => {
                    logger::log_warning(&format!(
                        "Path traversal attempt blocked: {}{}",
                        request.mount_prefix, request.path
                    ));
                    return None;
                }
                Err(ResolveError::BadPath) => return None,
            };
            if let Some(opened) = open_regular_file(&candidate).await {
                return Some((candidate, opened));
            }
        }
        None
    }
}
