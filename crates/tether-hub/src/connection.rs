//! Per-connection handler: register, then forward frames both ways.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::peers::PeerTable;

/// Outbound queue depth per peer. A peer this far behind misses frames.
const PEER_QUEUE: usize = 256;

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    peers: PeerTable,
) {
    let (mut sink, mut stream) = ws.split();

    let (tx, mut rx) = mpsc::channel::<String>(PEER_QUEUE);
    let id = peers.register(tx).await;

    tracing::info!(peer = %addr, id, "Window process connected");

    loop {
        tokio::select! {
            // Frames from other peers -> this process
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this process -> every other peer
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let delivered = peers.fan_out(id, &text).await;
                        tracing::trace!(id, delivered, "Frame forwarded");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    peers.unregister(id).await;
    tracing::info!(peer = %addr, id, "Window process disconnected");
}
