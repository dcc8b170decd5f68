//! Request path resolution
//!
//! Maps a request path onto the filesystem below a root directory. The
//! mapping is purely lexical: `.` and empty segments are dropped, `..`
//! removes the previous segment, and climbing above the root is rejected.
//! The result is always the root itself or a descendant of it.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Invalid UTF-8 after percent-decoding, or a segment that could be
    /// reinterpreted by the filesystem (NUL, backslash, drive prefix)
    BadPath,
    /// `..` segments climb above the root
    Escape,
}

/// Resolve `request_path` below `root`
///
/// The path is percent-decoded exactly once before normalisation, so
/// `%2e%2e` counts as `..` but `%252e` stays a literal file name.
pub fn resolve_under_root(root: &Path, request_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath)?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::Escape);
                }
            }
            s if s.contains(['\0', '\\']) || (cfg!(windows) && s.contains(':')) => {
                return Err(ResolveError::BadPath);
            }
            s => segments.push(s),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);

    if !resolved.starts_with(root) {
        return Err(ResolveError::Escape);
    }
    Ok(resolved)
}
