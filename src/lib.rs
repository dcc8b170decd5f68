//! cling
//!
//! Serves static assets mounted under URL prefixes and hands every other
//! request to an upstream fallback. The file-serving path resolves request
//! paths strictly inside the mount root, answers conditional GETs with
//! `304 Not Modified`, and transparently substitutes precompressed `.gz`
//! siblings for clients that accept gzip.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::{Error, Result};
