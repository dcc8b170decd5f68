//! Startup error types
//!
//! Request handling never fails: the responder turns every filesystem
//! problem into a response decision. These errors only cover loading
//! configuration, building application state, and binding the listener.

use thiserror::Error;

/// Errors that can abort server startup
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    /// The configuration was read but is semantically invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `server.host` and `server.port` do not form a socket address
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The logging subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logger(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
