// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections until `shutdown` is notified.
///
/// Connections already being served keep running in their own tasks; only
/// accepting stops.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }
}
