// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::collections::HashSet;
use std::net::SocketAddr;

use hyper::Uri;

use crate::error::{Error, Result};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DebugStrategy, FallbackConfig, HttpConfig, LoggingConfig, MountConfig,
    PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// Sources, lowest priority first: built-in defaults, the file (which may
    /// be absent), and `CLING__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("debug", false)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 60)?
            .set_default("performance.chunk_size", 65_536)?
            .set_default("http.server_name", concat!("cling/", env!("CARGO_PKG_VERSION")))?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CLING").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that deserialize but cannot be served
    pub fn validate(&self) -> Result<()> {
        if self.performance.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "performance.chunk_size must be greater than zero".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for mount in &self.mounts {
            if !names.insert(mount.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate mount name '{}'",
                    mount.name
                )));
            }

            let uri: Uri = mount.base_url.parse().map_err(|e| {
                Error::InvalidConfig(format!(
                    "mount '{}': invalid base_url '{}': {e}",
                    mount.name, mount.base_url
                ))
            })?;
            let path = uri.path();
            if !path.starts_with('/') || !path.ends_with('/') {
                return Err(Error::InvalidConfig(format!(
                    "mount '{}': base_url path '{path}' must start and end with '/'",
                    mount.name
                )));
            }

            if mount.index_file.is_empty() || mount.index_file.contains(['/', '\\']) {
                return Err(Error::InvalidConfig(format!(
                    "mount '{}': index_file must be a plain file name",
                    mount.name
                )));
            }
        }

        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| Error::Address { addr, source })
    }
}
