//! Request handler module
//!
//! Static mounts, the file responders behind them, and the upstream fallback
//! for everything else.

mod decision;
pub mod debug;
pub mod mount;
mod request;
pub mod resolve;
pub mod responder;
pub mod router;
pub mod upstream;

pub use decision::{BodySource, ResponseDecision};
pub use request::StaticRequest;
pub use responder::handle;

// Re-export main entry point
pub use router::handle_request;
