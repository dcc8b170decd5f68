// Application state module
// Holds the configuration plus everything derived from it once at startup

use hyper::header::HeaderValue;

use super::types::Config;
use crate::error::{Error, Result};
use crate::handler::mount::Mount;
use crate::handler::upstream::Upstream;

/// Application state, shared read-only by every connection
pub struct AppState {
    pub config: Config,
    /// Static mounts in match order; the serving strategy of each is fixed here
    pub mounts: Vec<Mount>,
    pub upstream: Upstream,
    /// Pre-validated `Server` header value
    pub server_header: HeaderValue,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let mounts = config
            .mounts
            .iter()
            .map(|mount| Mount::new(mount, config.debug))
            .collect::<Result<Vec<_>>>()?;

        let upstream = Upstream::from_config(&config.fallback)?;

        let server_header = HeaderValue::from_str(&config.http.server_name).map_err(|e| {
            Error::InvalidConfig(format!(
                "http.server_name '{}' is not a valid header value: {e}",
                config.http.server_name
            ))
        })?;

        Ok(Self {
            config,
            mounts,
            upstream,
            server_header,
        })
    }

    /// First mount whose prefix covers `path`
    pub fn find_mount(&self, path: &str) -> Option<&Mount> {
        self.mounts.iter().find(|mount| mount.should_handle(path))
    }
}
