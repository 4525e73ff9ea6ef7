// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Notify `shutdown` on SIGTERM or SIGINT (Unix only)
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let reason = tokio::select! {
            _ = sigterm.recv() => "SIGTERM received",
            _ = sigint.recv() => "SIGINT received",
        };
        logger::log_shutdown(reason);
        shutdown.notify_one();
    });
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C received");
            shutdown.notify_one();
        }
    });
    Ok(())
}
