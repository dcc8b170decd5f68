// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Active connection slot, released when the serving task ends
struct ConnectionSlot(Arc<AtomicUsize>);

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, enforcing `performance.max_connections`.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `active` - Active connection counter
/// * `shutdown` - Flips to `true` when the server starts draining
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active: &Arc<AtomicUsize>,
    shutdown: watch::Receiver<bool>,
) {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let prev_count = active.fetch_add(1, Ordering::SeqCst);
    let slot = ConnectionSlot(Arc::clone(active));

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            logger::log_connection_limit(&peer_addr, max_conn);
            drop(slot);
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    tokio::spawn(serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        slot,
        shutdown,
    ));
}

async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    _slot: ConnectionSlot,
    mut shutdown: watch::Receiver<bool>,
) {
    let io = TokioIo::new(stream);
    let performance = &state.config.performance;

    let mut builder = http1::Builder::new();
    builder.keep_alive(performance.keep_alive);

    let service_state = Arc::clone(&state);
    let service = service_fn(move |req| {
        handler::handle_request(req, Arc::clone(&service_state), peer_addr)
    });

    let mut conn = std::pin::pin!(builder.serve_connection(io, service));

    let served = async {
        tokio::select! {
            result = conn.as_mut() => result,
            _ = shutdown.changed() => {
                // Finish the in-flight request, then close
                conn.as_mut().graceful_shutdown();
                conn.as_mut().await
            }
        }
    };

    // A timeout of zero disables the limit
    let result = if performance.connection_timeout == 0 {
        Ok(served.await)
    } else {
        tokio::time::timeout(Duration::from_secs(performance.connection_timeout), served).await
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_connection_timeout(&peer_addr),
    }
}
