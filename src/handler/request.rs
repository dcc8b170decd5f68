use hyper::header::HeaderMap;
use hyper::{Method, Uri};

/// The parts of an HTTP request the static responders look at
#[derive(Debug, Clone)]
pub struct StaticRequest {
    pub method: Method,
    /// Request path, still percent-encoded, relative to the mount
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub accept_encoding: Option<String>,
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
    /// URL prefix removed by the mount, restored in redirect locations
    pub mount_prefix: String,
}

impl StaticRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            accept_encoding: None,
            if_modified_since: None,
            if_none_match: None,
            mount_prefix: String::new(),
        }
    }

    /// Extract the request line and the conditional/negotiation headers
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: method.clone(),
            path: uri.path().to_string(),
            query: uri
                .query()
                .filter(|q| !q.is_empty())
                .map(ToString::to_string),
            accept_encoding: header("accept-encoding"),
            if_modified_since: header("if-modified-since"),
            if_none_match: header("if-none-match"),
            mount_prefix: String::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query: String = query.into();
        self.query = Some(query).filter(|q| !q.is_empty());
        self
    }

    #[must_use]
    pub fn with_accept_encoding(mut self, value: impl Into<String>) -> Self {
        self.accept_encoding = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_if_modified_since(mut self, value: impl Into<String>) -> Self {
        self.if_modified_since = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_if_none_match(mut self, value: impl Into<String>) -> Self {
        self.if_none_match = Some(value.into());
        self
    }

    /// Re-root the request below `prefix`, keeping the slash that follows it
    ///
    /// `/static/css/a.css` with prefix `/static/` becomes `/css/a.css`. The
    /// caller guarantees that `prefix` ends with `/` and that the path
    /// starts with it.
    #[must_use]
    pub fn transpose(&self, prefix: &str) -> Self {
        let cut = prefix.len().saturating_sub(1);
        let (removed, rest) = self.path.split_at(cut.min(self.path.len()));
        Self {
            path: rest.to_string(),
            mount_prefix: format!("{}{removed}", self.mount_prefix),
            ..self.clone()
        }
    }

    pub fn is_get_or_head(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Whether `Accept-Encoding` mentions gzip anywhere, ignoring case
    pub fn accepts_gzip(&self) -> bool {
        self.accept_encoding
            .as_deref()
            .is_some_and(|value| value.to_ascii_lowercase().contains("gzip"))
    }

    /// Location of the same resource with a trailing slash, query preserved
    pub fn redirect_location(&self) -> String {
        let mut location = format!("{}{}/", self.mount_prefix, self.path);
        if let Some(query) = &self.query {
            location.push('?');
            location.push_str(query);
        }
        location
    }
}
