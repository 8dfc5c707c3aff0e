use tether_common::SyncMessage;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::channel::Frame;

/// Receiving side of a [`SyncChannel`](crate::SyncChannel) endpoint.
///
/// Frames sent by the owning endpoint are skipped. A subscriber that
/// falls behind the buffer loses the skipped messages and keeps going.
pub struct Subscription {
    endpoint: u64,
    rx: broadcast::Receiver<Frame>,
}

impl Subscription {
    pub(crate) fn new(endpoint: u64, rx: broadcast::Receiver<Frame>) -> Self {
        Self { endpoint, rx }
    }

    /// Wait for the next message. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        loop {
            match self.rx.recv().await {
                Ok(frame) if frame.origin == self.endpoint => continue,
                Ok(frame) => return Some(frame.msg),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Sync subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking receive. `None` when nothing is pending.
    pub fn try_recv(&mut self) -> Option<SyncMessage> {
        loop {
            match self.rx.try_recv() {
                Ok(frame) if frame.origin == self.endpoint => continue,
                Ok(frame) => return Some(frame.msg),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Sync subscriber lagged, messages dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Guard returned by `subscribe_to_window_sync`. Dropping it stops the
/// handler task.
pub struct Unsubscribe {
    task: JoinHandle<()>,
}

impl Unsubscribe {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use crate::SyncChannel;
    use tether_common::{RegistrySnapshot, SyncMessage};

    #[tokio::test]
    async fn lagged_subscriber_skips_and_continues() {
        let main = SyncChannel::in_memory(2);
        let mut rx = main.endpoint().subscribe();

        for version in 1..=5 {
            main.broadcast_state(RegistrySnapshot::default(), version, "E1");
        }

        // Only the newest `capacity` messages survive.
        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first,
            SyncMessage::WindowStateUpdate {
                version: Some(4),
                ..
            }
        ));
        let second = rx.try_recv().unwrap();
        assert!(matches!(
            second,
            SyncMessage::WindowStateUpdate {
                version: Some(5),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn recv_ends_when_all_senders_drop() {
        let main = SyncChannel::in_memory(4);
        let mut rx = main.subscribe();
        drop(main);
        assert!(rx.recv().await.is_none());
    }
}
