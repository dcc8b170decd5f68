// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Development mode switch; mounts that honour it use the debug strategy
    #[serde(default)]
    pub debug: bool,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    /// Static mounts, matched in order
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
    /// Handler for requests outside every mount
    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `cling=debug`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on the lifetime of a single connection, in seconds
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
    /// Read buffer size used when streaming file bodies
    pub chunk_size: usize,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// A URL prefix served from a directory on disk
#[derive(Debug, Deserialize, Clone)]
pub struct MountConfig {
    pub name: String,
    /// Either a path (`/static/`) or an absolute URL; a URL with a host is
    /// served by someone else and never matches locally
    pub base_url: String,
    pub root_dir: PathBuf,
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Keep the production responder even when `debug` is on
    #[serde(default)]
    pub ignore_debug: bool,
    #[serde(default)]
    pub debug_strategy: DebugStrategy,
    /// Extra source directories searched before `root_dir` in debug mode
    #[serde(default)]
    pub finder_dirs: Vec<PathBuf>,
    /// `Cache-Control: public, max-age=N` on production responses
    #[serde(default)]
    pub cache_max_age: Option<u32>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_file() -> String {
    "index.html".to_string()
}

/// What a mount does in debug mode
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebugStrategy {
    /// Search `finder_dirs` then `root_dir`, uncached, no gzip variants
    #[default]
    Finders,
    /// Keep serving through the production responder (media uploads)
    Production,
}

/// Fallback handler for non-static requests
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackConfig {
    #[default]
    NotFound,
    Redirect {
        target: String,
        #[serde(default = "default_redirect_code")]
        code: u16,
    },
    Direct {
        status: u16,
        #[serde(default)]
        body: Option<String>,
        #[serde(default)]
        content_type: Option<String>,
    },
}

#[allow(clippy::missing_const_for_fn)]
fn default_redirect_code() -> u16 {
    302
}
