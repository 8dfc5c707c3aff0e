//! Satellite intents arriving on the sync channel.

use tether_common::SyncMessage;
use tracing::{debug, info};

use super::WindowRegistry;

impl WindowRegistry {
    /// Apply a message received from the channel. Returns `true` if the
    /// registry changed.
    ///
    /// Intents naming a key the registry no longer has are ignored, which
    /// also covers duplicate deliveries.
    pub fn apply_intent(&mut self, msg: &SyncMessage) -> bool {
        match msg {
            SyncMessage::WindowSyncRequest { from } => {
                debug!(from = %from, version = self.version, "Sync requested, re-sending snapshot");
                self.rebroadcast();
                false
            }
            SyncMessage::PopoutClosed { key } => {
                info!(key = %key, "Satellite closed its window");
                self.remove_window(key)
            }
            SyncMessage::PopoutPopIn { key } => {
                info!(key = %key, "Satellite popped its window back in");
                self.dock_window(key)
            }
            SyncMessage::WindowStateUpdate { .. } => {
                debug!("Ignoring state update from another publisher");
                false
            }
            SyncMessage::Unknown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{drain_versions, registry};
    use tether_common::{DisplayState, RegistrySnapshot, SyncMessage, WindowKey, WindowKind};

    #[test]
    fn sync_request_resends_current_version() {
        let (mut registry, _, mut rx) = registry();
        registry.add_window(WindowKind::Wallet);
        drain_versions(&mut rx);

        let changed = registry.apply_intent(&SyncMessage::WindowSyncRequest {
            from: "K1".into(),
        });
        assert!(!changed);
        assert_eq!(drain_versions(&mut rx), vec![registry.version()]);
    }

    #[test]
    fn popout_closed_removes_window() {
        let (mut registry, mirror, _) = registry();
        let key = registry.add_window(WindowKind::Token {
            chain_id: 8453,
            address: "0x833589".into(),
        });
        registry.pop_out_window(&key);

        assert!(registry.apply_intent(&SyncMessage::PopoutClosed { key: key.clone() }));
        assert!(registry.get_window(&key).is_none());
        assert!(tether_mirror::MirrorStore::get_window_by_key(&mirror, &key).is_none());
    }

    #[test]
    fn pop_in_docks_with_same_key() {
        let (mut registry, _, _) = registry();
        let key = registry.add_window(WindowKind::Message);
        registry.pop_out_window(&key);

        assert!(registry.apply_intent(&SyncMessage::PopoutPopIn { key: key.clone() }));
        assert_eq!(
            registry.get_window(&key).unwrap().display_state,
            DisplayState::Docked
        );
    }

    #[test]
    fn intents_for_unknown_keys_are_ignored() {
        let (mut registry, _, mut rx) = registry();
        drain_versions(&mut rx);
        let ghost = WindowKey::from("gone");

        assert!(!registry.apply_intent(&SyncMessage::PopoutClosed { key: ghost.clone() }));
        assert!(!registry.apply_intent(&SyncMessage::PopoutPopIn { key: ghost }));
        assert!(drain_versions(&mut rx).is_empty());
    }

    #[test]
    fn duplicate_close_is_applied_once() {
        let (mut registry, _, mut rx) = registry();
        let key = registry.add_window(WindowKind::Wallet);
        drain_versions(&mut rx);

        let close = SyncMessage::PopoutClosed { key };
        assert!(registry.apply_intent(&close));
        assert!(!registry.apply_intent(&close));
        assert_eq!(drain_versions(&mut rx).len(), 1);
    }

    #[test]
    fn foreign_state_updates_and_unknown_messages_are_ignored() {
        let (mut registry, _, _) = registry();
        registry.add_window(WindowKind::Wallet);
        let before = registry.snapshot();

        assert!(!registry.apply_intent(&SyncMessage::WindowStateUpdate {
            windows: RegistrySnapshot::default(),
            version: Some(999),
            epoch: None,
        }));
        assert!(!registry.apply_intent(&SyncMessage::Unknown));
        assert_eq!(registry.snapshot(), before);
    }
}
