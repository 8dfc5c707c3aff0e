use std::sync::atomic::{AtomicU64, Ordering};

use tether_common::{RegistrySnapshot, SyncMessage, WindowKey};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};

use crate::subscription::{Subscription, Unsubscribe};

/// Origin of frames that arrived from the hub.
pub(crate) const REMOTE_ORIGIN: u64 = 0;

static NEXT_ENDPOINT: AtomicU64 = AtomicU64::new(1);

fn next_endpoint() -> u64 {
    NEXT_ENDPOINT.fetch_add(1, Ordering::Relaxed)
}

/// A message tagged with the endpoint that sent it.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub(crate) origin: u64,
    pub(crate) msg: SyncMessage,
}

/// Work for the hub writer task.
#[derive(Debug)]
pub(crate) enum Outbound {
    Text(String),
    /// Send a WebSocket close frame and stop writing.
    Close,
}

/// Writer queue plus a flag the reader raises once the hub hangs up.
#[derive(Debug, Clone)]
pub(crate) struct Uplink {
    pub(crate) tx: mpsc::UnboundedSender<Outbound>,
    pub(crate) closed: watch::Receiver<bool>,
}

/// Handle to the window broadcast channel.
///
/// Clones are the same endpoint. Use [`SyncChannel::endpoint`] to attach
/// another independent participant to the same bus.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    endpoint: u64,
    local: broadcast::Sender<Frame>,
    /// Encoded frames bound for the hub, when connected to one.
    uplink: Option<Uplink>,
}

impl SyncChannel {
    /// Process-local bus with the given per-subscriber capacity.
    pub fn in_memory(capacity: usize) -> Self {
        let (local, _) = broadcast::channel(capacity.max(1));
        Self {
            endpoint: next_endpoint(),
            local,
            uplink: None,
        }
    }

    pub(crate) fn with_uplink(local: broadcast::Sender<Frame>, uplink: Uplink) -> Self {
        Self {
            endpoint: next_endpoint(),
            local,
            uplink: Some(uplink),
        }
    }

    /// A new participant on the same bus. It receives messages sent by
    /// this handle and vice versa.
    pub fn endpoint(&self) -> Self {
        Self {
            endpoint: next_endpoint(),
            local: self.local.clone(),
            uplink: self.uplink.clone(),
        }
    }

    /// Whether this handle forwards to a hub.
    pub fn is_connected(&self) -> bool {
        self.uplink.as_ref().is_some_and(|up| !up.tx.is_closed())
    }

    /// Fire-and-forget send. Never blocks; a message nobody is listening
    /// for is simply lost.
    pub fn send(&self, msg: SyncMessage) {
        if let Some(uplink) = &self.uplink {
            match msg.to_json() {
                Ok(json) => {
                    if uplink.tx.send(Outbound::Text(json)).is_err() {
                        debug!(kind = msg.type_name(), "Hub uplink closed, message not forwarded");
                    }
                }
                Err(e) => warn!(kind = msg.type_name(), error = %e, "Failed to encode sync message"),
            }
        }

        let kind = msg.type_name();
        let receivers = self
            .local
            .send(Frame {
                origin: self.endpoint,
                msg,
            })
            .unwrap_or(0);
        debug!(kind, receivers, "Sync message sent");
    }

    /// Hand every queued frame to the hub, then disconnect.
    ///
    /// Returns once the hub has dropped the connection, which it only
    /// does after forwarding everything sent before the close frame.
    /// Every handle sharing this connection is disconnected. A no-op for
    /// an in-memory bus. Callers bound this with a timeout.
    pub async fn close(&self) {
        let Some(uplink) = &self.uplink else {
            return;
        };
        if uplink.tx.send(Outbound::Close).is_err() {
            debug!("Hub uplink already stopped");
        }
        let mut closed = uplink.closed.clone();
        let _ = closed.wait_for(|closed| *closed).await;
    }

    /// Receive every message sent by other endpoints from now on.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.endpoint, self.local.subscribe())
    }

    /// Run `handler` for each incoming message on a background task.
    ///
    /// Must be called from within a tokio runtime. The returned guard
    /// stops the task when dropped or when `unsubscribe` is called.
    pub fn subscribe_to_window_sync<F>(&self, mut handler: F) -> Unsubscribe
    where
        F: FnMut(SyncMessage) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(msg) = subscription.recv().await {
                handler(msg);
            }
        });
        Unsubscribe::new(task)
    }

    /// Ask the registry to re-push the current snapshot.
    pub fn request_window_sync(&self, from: impl Into<String>) {
        self.send(SyncMessage::WindowSyncRequest { from: from.into() });
    }

    /// Intent: the user closed this satellite for good.
    pub fn broadcast_popout_closed(&self, key: &WindowKey) {
        self.send(SyncMessage::PopoutClosed { key: key.clone() });
    }

    /// Intent: fold this satellite back into the main window.
    pub fn broadcast_popout_pop_in(&self, key: &WindowKey) {
        self.send(SyncMessage::PopoutPopIn { key: key.clone() });
    }

    /// Push a full snapshot to every satellite. `epoch` names the
    /// registry instance that `version` counts for.
    pub fn broadcast_state(&self, windows: RegistrySnapshot, version: u64, epoch: &str) {
        self.send(SyncMessage::WindowStateUpdate {
            windows,
            version: Some(version),
            epoch: Some(epoch.to_string()),
        });
    }
}
