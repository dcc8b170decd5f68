//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

use mime_guess::mime;

/// Type used when the extension is unknown
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Get MIME Content-Type for a file path
///
/// Text types get an explicit UTF-8 charset. Unknown extensions fall back
/// to `text/plain`.
///
/// # Examples
/// ```
/// use cling::http::mime::get_content_type;
/// use std::path::Path;
///
/// assert_eq!(get_content_type(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Path::new("logo.png")), "image/png");
/// assert_eq!(get_content_type(Path::new("LICENSE")), "text/plain");
/// ```
pub fn get_content_type(path: &Path) -> String {
    match mime_guess::from_path(path).first() {
        Some(guess) if guess.type_() == mime::TEXT && guess.get_param(mime::CHARSET).is_none() => {
            format!("{}; charset=utf-8", guess.essence_str())
        }
        Some(guess) => guess.to_string(),
        None => FALLBACK_CONTENT_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(
            get_content_type(Path::new("a/index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            get_content_type(Path::new("style.css")),
            "text/css; charset=utf-8"
        );
        assert_eq!(get_content_type(Path::new("data.json")), "application/json");
        assert_eq!(get_content_type(Path::new("logo.png")), "image/png");
        assert_eq!(get_content_type(Path::new("clip.mp4")), "video/mp4");
    }

    #[test]
    fn test_javascript() {
        let js = get_content_type(Path::new("app.js"));
        assert!(js.contains("javascript"), "unexpected type: {js}");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Path::new("blob.zzqx")), "text/plain");
        assert_eq!(get_content_type(Path::new("README")), "text/plain");
    }
}
