//! tether-hub: local WebSocket fan-out for window processes.
//!
//! Every connected window process is a peer. A text frame received from
//! one peer is forwarded to every other peer. The hub never inspects
//! payloads and keeps no history, so a peer that connects late misses
//! earlier frames and must ask for a re-sync.

mod connection;
mod peers;

pub use peers::PeerTable;

use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;

/// Accept connections on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, peers: PeerTable) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let peers = peers.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, peers).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
