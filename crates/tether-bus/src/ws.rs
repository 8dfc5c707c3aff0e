//! Hub transport: joins the local `tether-hub` over WebSocket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tether_common::{BusError, SyncMessage};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::channel::{Frame, Outbound, Uplink, REMOTE_ORIGIN};
use crate::SyncChannel;

impl SyncChannel {
    /// Connect to the hub at `url`.
    ///
    /// Outgoing messages are queued on an unbounded uplink so `send`
    /// never waits on the socket. Incoming frames are decoded and
    /// delivered to every local subscriber; undecodable frames are
    /// dropped. There is no reconnect: once the hub goes away the
    /// channel keeps working locally and remote sends are lost.
    /// [`SyncChannel::close`] drains the uplink before a process exits.
    pub async fn connect(url: &str, capacity: usize, timeout: Duration) -> Result<Self, BusError> {
        let (ws_stream, _) =
            match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url)).await {
                Ok(Ok(conn)) => conn,
                Ok(Err(e)) => return Err(BusError::ConnectFailed(e.to_string())),
                Err(_elapsed) => return Err(BusError::ConnectTimeout(timeout.as_secs())),
            };

        info!(url = %url, "Connected to window hub");

        let (mut ws_write, mut ws_read) = ws_stream.split();
        let (local, _) = broadcast::channel::<Frame>(capacity.max(1));
        let (uplink_tx, mut uplink_rx) = mpsc::unbounded_channel::<Outbound>();
        let (closed_tx, closed_rx) = watch::channel(false);

        // Uplink: local sends -> hub, in order, until a close is queued.
        tokio::spawn(async move {
            while let Some(out) = uplink_rx.recv().await {
                match out {
                    Outbound::Text(json) => {
                        if let Err(e) = ws_write.send(WsMessage::Text(json.into())).await {
                            warn!(error = %e, "Hub write failed, uplink stopped");
                            break;
                        }
                    }
                    Outbound::Close => {
                        debug!("Closing hub uplink");
                        break;
                    }
                }
            }
            let _ = ws_write.close().await;
        });

        // Downlink: hub frames -> local subscribers.
        let downlink = local.clone();
        tokio::spawn(async move {
            while let Some(frame) = ws_read.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => {
                        if let Some(msg) = SyncMessage::from_json(&text) {
                            let _ = downlink.send(Frame {
                                origin: REMOTE_ORIGIN,
                                msg,
                            });
                        }
                    }
                    Ok(WsMessage::Close(_)) => break,
                    Err(e) => {
                        debug!(error = %e, "Hub read error");
                        break;
                    }
                    _ => {}
                }
            }
            info!("Window hub connection closed");
            closed_tx.send_replace(true);
        });

        Ok(SyncChannel::with_uplink(
            local,
            Uplink {
                tx: uplink_tx,
                closed: closed_rx,
            },
        ))
    }
}
