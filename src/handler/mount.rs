//! Static mounts
//!
//! A mount owns a URL prefix and decides whether a request belongs to it.
//! The serving strategy is fixed when the mount is built.

use std::fmt;

use hyper::Uri;

use super::debug::DebugResponder;
use super::decision::ResponseDecision;
use super::request::StaticRequest;
use super::responder::Responder;
use crate::config::{DebugStrategy, MountConfig};
use crate::error::{Error, Result};
use crate::http::cache::CachePolicy;

/// How a mount serves its files
#[derive(Debug, Clone)]
pub enum Strategy {
    Production(Responder),
    Debug(DebugResponder),
}

impl Strategy {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Production(_) => "production",
            Self::Debug(_) => "debug",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Mount {
    name: String,
    base_url: String,
    base_path: String,
    /// Base URL points at another host; requests are never served here
    remote: bool,
    strategy: Strategy,
}

impl Mount {
    /// Build a mount, choosing its strategy from the global `debug` switch
    pub fn new(config: &MountConfig, debug: bool) -> Result<Self> {
        let uri: Uri = config.base_url.parse().map_err(|e| {
            Error::InvalidConfig(format!(
                "mount '{}': invalid base_url '{}': {e}",
                config.name, config.base_url
            ))
        })?;

        let production = !debug
            || config.ignore_debug
            || config.debug_strategy == DebugStrategy::Production;

        let strategy = if production {
            let mut responder = Responder::new(&config.root_dir, &config.index_file);
            if let Some(max_age) = config.cache_max_age {
                responder = responder.with_cache_policy(CachePolicy::Public(max_age));
            }
            Strategy::Production(responder)
        } else {
            Strategy::Debug(DebugResponder::new(
                &config.root_dir,
                config.finder_dirs.clone(),
            ))
        };

        Ok(Self {
            name: config.name.clone(),
            base_url: config.base_url.clone(),
            base_path: uri.path().to_string(),
            remote: uri.host().is_some(),
            strategy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Whether a request for `path` is served by this mount
    pub fn should_handle(&self, path: &str) -> bool {
        !self.remote && path.starts_with(&self.base_path)
    }

    /// Serve a request already matched by [`Mount::should_handle`]
    pub async fn serve(&self, request: &StaticRequest) -> ResponseDecision {
        let request = request.transpose(&self.base_path);
        match &self.strategy {
            Strategy::Production(responder) => responder.handle(&request).await,
            Strategy::Debug(responder) => responder.handle(&request).await,
        }
    }
}
