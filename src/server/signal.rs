// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::logger;

/// Resolves once the process is asked to stop
///
/// Listens for SIGTERM and SIGINT on Unix and for Ctrl+C elsewhere. If the
/// handlers cannot be installed the future never resolves, so the server
/// keeps running until it is killed.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => logger::log_signal("SIGTERM"),
                    _ = sigint.recv() => logger::log_signal("SIGINT"),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!(
                    "Failed to register Unix signal handlers, falling back to Ctrl+C: {e}"
                ));
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_signal("Ctrl+C"),
        Err(e) => {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
