//! `WindowRegistry` state, lifecycle, and publication.

use std::sync::Arc;

use tether_bus::SyncChannel;
use tether_common::{new_id, RegistrySnapshot, Window, WindowKey};
use tether_mirror::{MirrorPayload, MirrorStore};
use tracing::{info, warn};

mod intents;
mod operations;

/// Canonical set of live windows.
///
/// Only the main window process holds one. Windows are kept in creation
/// order, so every snapshot is already sorted by `created_at`.
pub struct WindowRegistry {
    windows: Vec<Window>,
    last_created_at: u64,
    version: u64,
    /// Fresh per `init`; satellites compare versions only within one epoch.
    epoch: String,
    mirror: Arc<dyn MirrorStore>,
    channel: SyncChannel,
}

impl WindowRegistry {
    /// Start the registry at main-window startup.
    ///
    /// The mirror is consulted only to continue its version counter; the
    /// registry itself starts empty and publishes that, so satellites left
    /// over from an earlier session see their window disappear.
    pub fn init(mirror: Arc<dyn MirrorStore>, channel: SyncChannel) -> Self {
        let version = mirror.version();
        let mut registry = Self {
            windows: Vec::new(),
            last_created_at: 0,
            version,
            epoch: new_id(),
            mirror,
            channel,
        };
        registry.publish();
        info!(
            version = registry.version,
            epoch = %registry.epoch,
            "Window registry started"
        );
        registry
    }

    /// Tear the registry down at main-window shutdown.
    pub fn shutdown(self) {
        info!(
            windows = self.windows.len(),
            version = self.version,
            "Window registry stopped"
        );
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::new(self.windows.clone())
    }

    pub fn get_window(&self, key: &WindowKey) -> Option<&Window> {
        self.windows.iter().find(|w| &w.key == key)
    }

    /// Version of the last published snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn channel(&self) -> &SyncChannel {
        &self.channel
    }

    fn position(&self, key: &WindowKey) -> Option<usize> {
        self.windows.iter().position(|w| &w.key == key)
    }

    /// Broadcast the new snapshot, then mirror it.
    ///
    /// The broadcast goes first so the mirror is never ahead of what a
    /// listening satellite could have received.
    fn publish(&mut self) {
        self.version += 1;
        let snapshot = self.snapshot();
        self.channel
            .broadcast_state(snapshot.clone(), self.version, &self.epoch);
        if let Err(e) = self
            .mirror
            .write(&MirrorPayload::new(self.version, snapshot))
        {
            warn!(version = self.version, error = %e, "Mirror write failed");
        }
    }

    /// Re-send the current snapshot without bumping the version.
    fn rebroadcast(&self) {
        self.channel
            .broadcast_state(self.snapshot(), self.version, &self.epoch);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tether_bus::Subscription;
    use tether_common::{DisplayState, SyncMessage, WindowKind};
    use tether_mirror::MemoryMirror;

    pub(super) fn registry() -> (WindowRegistry, MemoryMirror, Subscription) {
        let mirror = MemoryMirror::new();
        let channel = SyncChannel::in_memory(64);
        let rx = channel.endpoint().subscribe();
        let registry = WindowRegistry::init(Arc::new(mirror.clone()), channel);
        (registry, mirror, rx)
    }

    pub(super) fn drain_versions(rx: &mut Subscription) -> Vec<u64> {
        let mut versions = Vec::new();
        while let Some(msg) = rx.try_recv() {
            if let SyncMessage::WindowStateUpdate {
                version: Some(v), ..
            } = msg
            {
                versions.push(v);
            }
        }
        versions
    }

    fn token(chain_id: u64, address: &str) -> WindowKind {
        WindowKind::Token {
            chain_id,
            address: address.into(),
        }
    }

    #[test]
    fn init_publishes_empty_snapshot() {
        let (registry, mirror, mut rx) = registry();
        assert!(registry.is_empty());
        assert_eq!(registry.version(), 1);
        assert_eq!(drain_versions(&mut rx), vec![1]);
        let payload = mirror.read().unwrap();
        assert_eq!(payload.version, 1);
        assert!(payload.windows.is_empty());
    }

    #[test]
    fn init_continues_mirror_version() {
        let mirror = MemoryMirror::with_payload(MirrorPayload::new(41, RegistrySnapshot::default()));
        let registry = WindowRegistry::init(Arc::new(mirror.clone()), SyncChannel::in_memory(8));
        assert_eq!(registry.version(), 42);
        assert_eq!(mirror.version(), 42);
    }

    #[test]
    fn each_init_gets_a_new_epoch() {
        let mirror = MemoryMirror::new();
        let channel = SyncChannel::in_memory(8);
        let mut rx = channel.endpoint().subscribe();
        let first = WindowRegistry::init(Arc::new(mirror.clone()), channel.clone());
        let second = WindowRegistry::init(Arc::new(mirror), channel);
        assert_ne!(first.epoch(), second.epoch());

        let epochs: Vec<Option<String>> = std::iter::from_fn(|| rx.try_recv())
            .filter_map(|msg| match msg {
                SyncMessage::WindowStateUpdate { epoch, .. } => Some(epoch),
                _ => None,
            })
            .collect();
        assert_eq!(
            epochs,
            vec![
                Some(first.epoch().to_string()),
                Some(second.epoch().to_string())
            ]
        );
    }

    #[test]
    fn singleton_add_returns_same_key() {
        let (mut registry, _, _) = registry();
        let k1 = registry.add_window(WindowKind::Wallet);
        let k2 = registry.add_window(WindowKind::Wallet);
        assert_eq!(k1, k2);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn each_singleton_kind_is_independent() {
        let (mut registry, _, _) = registry();
        let wallet = registry.add_window(WindowKind::Wallet);
        let message = registry.add_window(WindowKind::Message);
        assert_ne!(wallet, message);
        assert_eq!(registry.add_window(WindowKind::Message), message);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_singleton_add_does_not_publish() {
        let (mut registry, _, mut rx) = registry();
        registry.add_window(WindowKind::Wallet);
        drain_versions(&mut rx);

        registry.add_window(WindowKind::Wallet);
        assert!(drain_versions(&mut rx).is_empty());
    }

    #[test]
    fn minimized_singleton_is_restored_on_add() {
        let (mut registry, _, _) = registry();
        let key = registry.add_window(WindowKind::Message);
        registry.minimize_window(&key);
        let version = registry.version();

        assert_eq!(registry.add_window(WindowKind::Message), key);
        assert_eq!(
            registry.get_window(&key).unwrap().display_state,
            DisplayState::Docked
        );
        assert_eq!(registry.version(), version + 1);
    }

    #[test]
    fn popped_out_singleton_stays_popped_out_on_add() {
        let (mut registry, _, _) = registry();
        let key = registry.add_window(WindowKind::Wallet);
        registry.pop_out_window(&key);

        assert_eq!(registry.add_window(WindowKind::Wallet), key);
        assert_eq!(
            registry.get_window(&key).unwrap().display_state,
            DisplayState::PoppedOut
        );
    }

    #[test]
    fn non_singleton_adds_are_distinct() {
        let (mut registry, _, _) = registry();
        let a = registry.add_window(token(8453, "0x833589"));
        let b = registry.add_window(token(1, "0xA0b869"));
        assert_ne!(a, b);
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn identical_non_singleton_params_are_not_deduplicated() {
        let (mut registry, _, _) = registry();
        let url = WindowKind::Miniapp {
            url: "https://app.example".into(),
        };
        let a = registry.add_window(url.clone());
        let b = registry.add_window(url);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn new_windows_are_docked_and_ordered() {
        let (mut registry, _, _) = registry();
        let a = registry.add_window(token(1, "0xA"));
        let b = registry.add_window(WindowKind::Wallet);
        let snapshot = registry.snapshot();
        let keys: Vec<&WindowKey> = snapshot.iter().map(|w| &w.key).collect();
        assert_eq!(keys, vec![&a, &b]);
        assert!(snapshot
            .iter()
            .all(|w| w.display_state == DisplayState::Docked));
        assert!(snapshot.windows()[0].created_at < snapshot.windows()[1].created_at);
    }

    #[test]
    fn every_mutation_reaches_channel_and_mirror() {
        let (mut registry, mirror, mut rx) = registry();
        let key = registry.add_window(WindowKind::Wallet);
        registry.minimize_window(&key);
        registry.remove_window(&key);

        assert_eq!(drain_versions(&mut rx), vec![1, 2, 3, 4]);
        assert_eq!(mirror.version(), 4);
        assert!(mirror.get_window_by_key(&key).is_none());
    }

    #[test]
    fn mirror_failure_does_not_block_broadcast() {
        struct BrokenMirror;
        impl MirrorStore for BrokenMirror {
            fn read(&self) -> Option<MirrorPayload> {
                None
            }
            fn write(&self, _: &MirrorPayload) -> Result<(), tether_common::MirrorError> {
                Err(tether_common::MirrorError::WriteFailed {
                    path: "window-mirror.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                })
            }
        }

        let channel = SyncChannel::in_memory(8);
        let mut rx = channel.endpoint().subscribe();
        let mut registry = WindowRegistry::init(Arc::new(BrokenMirror), channel);
        registry.add_window(WindowKind::Wallet);
        assert_eq!(drain_versions(&mut rx), vec![1, 2]);
    }

    #[test]
    fn file_mirror_sees_latest_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("window-mirror.json");
        let mirror = tether_mirror::FileMirror::new(&path);
        let mut registry =
            WindowRegistry::init(Arc::new(mirror.clone()), SyncChannel::in_memory(8));

        let key = registry.add_window(token(8453, "0x833589"));
        registry.pop_out_window(&key);

        let window = mirror.get_window_by_key(&key).unwrap();
        assert_eq!(window.display_state, DisplayState::PoppedOut);
        assert_eq!(mirror.version(), registry.version());
    }

    #[test]
    fn shutdown_consumes_registry() {
        let (mut registry, mirror, _) = registry();
        registry.add_window(WindowKind::Wallet);
        registry.shutdown();
        // The mirror keeps the last snapshot for the next cold start.
        assert_eq!(mirror.read().unwrap().windows.len(), 1);
    }
}
