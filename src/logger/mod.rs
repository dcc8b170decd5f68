//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Events go through `tracing`. Access lines use the `access` target and are
//! routed to their own writer; everything else is filtered by the configured
//! level and written to the error log.

mod format;

pub use format::AccessLogEntry;

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, EnvFilter};

use crate::config::{AppState, LoggingConfig};
use crate::error::{Error, Result};
use crate::handler::mount::Strategy;

/// Target of access log events
pub const ACCESS_TARGET: &str = "access";

/// Keeps the background log writers alive; flushes them on drop
#[must_use = "dropping the guard stops the log writers"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Install the global subscriber
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let mut guards = Vec::new();

    let level_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::Logger(format!("invalid log level '{}': {e}", config.level)))?
        .add_directive(
            format!("{ACCESS_TARGET}=off")
                .parse()
                .map_err(|e| Error::Logger(format!("{e}")))?,
        );

    let (server_writer, guard) = match &config.error_log_file {
        Some(path) => file_writer(path)?,
        None => tracing_appender::non_blocking(io::stderr()),
    };
    guards.push(guard);
    let server_layer = fmt::layer()
        .with_writer(server_writer)
        .with_ansi(config.error_log_file.is_none() && io::stderr().is_terminal())
        .with_filter(level_filter);

    let access_layer = if config.access_log {
        let (access_writer, guard) = match &config.access_log_file {
            Some(path) => file_writer(path)?,
            None => tracing_appender::non_blocking(io::stdout()),
        };
        guards.push(guard);
        Some(
            fmt::layer()
                .with_writer(access_writer)
                .with_ansi(false)
                .without_time()
                .with_level(false)
                .with_target(false)
                .with_filter(filter::filter_fn(|meta| meta.target() == ACCESS_TARGET)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(server_layer)
        .with(access_layer)
        .try_init()
        .map_err(|e| Error::Logger(e.to_string()))?;

    Ok(LogGuard { _guards: guards })
}

/// Non-blocking writer appending to `path`, creating parent directories
fn file_writer(path: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_appender::non_blocking(file))
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    tracing::info!("Server started, listening on http://{addr}");
    tracing::info!(
        "Log level: {}, debug mode: {}",
        config.logging.level,
        config.debug
    );
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(path) = &config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    for mount in &state.mounts {
        match mount.strategy() {
            Strategy::Production(responder) => tracing::info!(
                "Mount '{}': {} -> {} (production)",
                mount.name(),
                mount.base_url(),
                responder.root_dir().display()
            ),
            Strategy::Debug(responder) => tracing::info!(
                "Mount '{}': {} -> {} (debug, finders first)",
                mount.name(),
                mount.base_url(),
                responder.root_dir().display()
            ),
        }
    }
    if state.mounts.is_empty() {
        tracing::warn!("No mounts configured; every request goes to the fallback");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("[Connection] Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(peer_addr: &SocketAddr) {
    tracing::warn!("[Connection] Timed out: {peer_addr}");
}

pub fn log_connection_limit(peer_addr: &SocketAddr, max: u64) {
    tracing::warn!("[Connection] Limit of {max} reached, rejecting {peer_addr}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_signal(name: &str) {
    tracing::info!("[Signal] {name} received, shutting down");
}

pub fn log_shutdown_started(active: usize) {
    tracing::info!("[Shutdown] Stopped accepting, draining {active} active connection(s)");
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        tracing::info!("[Shutdown] Complete");
    } else {
        tracing::warn!("[Shutdown] Complete, {remaining} connection(s) still open");
    }
}
