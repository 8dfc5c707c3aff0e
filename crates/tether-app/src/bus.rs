//! Wiring shared by both window roles: the sync channel and the mirror.

use std::sync::Arc;
use std::time::Duration;

use tether_bus::SyncChannel;
use tether_config::TetherConfig;
use tether_mirror::{FileMirror, MemoryMirror, MirrorStore};

/// Join the hub, or fall back to a process-local channel.
///
/// A window without the hub still works; it just cannot see other
/// processes.
pub async fn connect(config: &TetherConfig) -> SyncChannel {
    let capacity = config.channel.capacity as usize;
    let timeout = Duration::from_secs(u64::from(config.hub.connect_timeout));
    match SyncChannel::connect(&config.hub.url, capacity, timeout).await {
        Ok(channel) => channel,
        Err(e) => {
            tracing::warn!(
                url = %config.hub.url,
                error = %e,
                "Hub unavailable, using an in-process channel"
            );
            SyncChannel::in_memory(capacity)
        }
    }
}

/// The mirror file from config, or an in-memory slot when no data
/// directory can be resolved.
pub fn mirror(config: &TetherConfig) -> Arc<dyn MirrorStore> {
    match tether_config::mirror_path(config) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using mirror file");
            Arc::new(FileMirror::new(path))
        }
        None => {
            tracing::warn!("No data directory, window mirror will not persist");
            Arc::new(MemoryMirror::new())
        }
    }
}
