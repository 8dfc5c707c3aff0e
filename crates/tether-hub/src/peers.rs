//! Peer table: every connected window process and its outbound queue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

/// Thread-safe table of connected peers.
#[derive(Clone, Default)]
pub struct PeerTable {
    peers: Arc<RwLock<HashMap<u64, mpsc::Sender<String>>>>,
    next_id: Arc<AtomicU64>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer's outbound queue and return its id.
    pub async fn register(&self, tx: mpsc::Sender<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.peers.write().await.insert(id, tx);
        id
    }

    pub async fn unregister(&self, id: u64) -> bool {
        self.peers.write().await.remove(&id).is_some()
    }

    /// Forward `text` to every peer except `from`. Peers whose queue is
    /// full miss the frame. Returns how many peers accepted it.
    pub async fn fan_out(&self, from: u64, text: &str) -> usize {
        let peers = self.peers.read().await;
        let mut delivered = 0;
        for (id, tx) in peers.iter() {
            if *id == from {
                continue;
            }
            match tx.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(peer = id, "Peer queue full, frame dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Number of connected peers.
    pub async fn count(&self) -> usize {
        self.peers.read().await.len()
    }
}
