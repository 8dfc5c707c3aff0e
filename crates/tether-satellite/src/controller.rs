use std::sync::Arc;

use tether_bus::{Subscription, SyncChannel};
use tether_common::{DisplayState, RegistrySnapshot, SyncMessage, WindowKey};
use tether_mirror::MirrorStore;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::latch::TerminalLatch;
use crate::state::{RenderState, SatelliteView, SyncState, TerminationReason};

/// User actions available inside a satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteCommand {
    PopIn,
    Close,
}

/// Drives one satellite window for `key`.
pub struct SatelliteController {
    key: WindowKey,
    channel: SyncChannel,
    mirror: Arc<dyn MirrorStore>,
    latch: TerminalLatch,
    last_epoch: Option<String>,
    last_version: Option<u64>,
    view: SatelliteView,
    view_tx: watch::Sender<SatelliteView>,
}

impl SatelliteController {
    pub fn new(key: WindowKey, channel: SyncChannel, mirror: Arc<dyn MirrorStore>) -> Self {
        let (view_tx, _) = watch::channel(SatelliteView::default());
        Self {
            key,
            channel,
            mirror,
            latch: TerminalLatch::new(),
            last_epoch: None,
            last_version: None,
            view: SatelliteView::default(),
            view_tx,
        }
    }

    pub fn key(&self) -> &WindowKey {
        &self.key
    }

    pub fn sync_state(&self) -> SyncState {
        self.view.sync
    }

    pub fn render_state(&self) -> &RenderState {
        &self.view.render
    }

    /// Follow state changes from another task.
    pub fn watch(&self) -> watch::Receiver<SatelliteView> {
        self.view_tx.subscribe()
    }

    /// Handle for an OS close hook. Shares this controller's latch.
    pub fn close_guard(&self) -> CloseGuard {
        CloseGuard {
            key: self.key.clone(),
            channel: self.channel.clone(),
            latch: self.latch.clone(),
        }
    }

    /// Render from the mirror, subscribe, then ask for a live snapshot.
    ///
    /// The subscription is taken before the request goes out so the reply
    /// cannot be missed.
    pub fn mount(&mut self) -> Subscription {
        let render = match self.mirror.get_window_by_key(&self.key) {
            Some(window) => {
                debug!(key = %self.key, "Rendering mirrored window");
                RenderState::Stale(window)
            }
            None => {
                debug!(key = %self.key, "Window not in mirror, loading");
                RenderState::Loading
            }
        };
        let subscription = self.channel.subscribe();
        self.channel.request_window_sync(self.key.as_str());
        self.set_view(SyncState::AwaitingSync, render);
        info!(key = %self.key, "Satellite mounted");
        subscription
    }

    /// Apply one channel message. Only state updates matter here.
    pub fn handle_message(&mut self, msg: SyncMessage) {
        if self.view.sync.is_terminated() {
            return;
        }
        if let SyncMessage::WindowStateUpdate {
            windows,
            version,
            epoch,
        } = msg
        {
            self.apply_update(windows, version, epoch);
        }
    }

    fn apply_update(
        &mut self,
        windows: RegistrySnapshot,
        version: Option<u64>,
        epoch: Option<String>,
    ) {
        if epoch.is_some() && epoch != self.last_epoch {
            if self.last_epoch.is_some() {
                info!(key = %self.key, "Registry restarted, version count reset");
            }
            self.last_epoch = epoch;
            self.last_version = None;
        }
        if let (Some(v), Some(last)) = (version, self.last_version) {
            if v < last {
                debug!(key = %self.key, version = v, last, "Discarding stale update");
                return;
            }
        }
        if version.is_some() {
            self.last_version = version;
        }

        let Some(window) = windows.find(&self.key).cloned() else {
            info!(key = %self.key, "Window removed from registry");
            self.terminate_remotely(TerminationReason::Removed);
            return;
        };

        if self.view.sync == SyncState::Synced && window.display_state != DisplayState::PoppedOut {
            info!(
                key = %self.key,
                state = window.display_state.as_str(),
                "Window reclaimed by main window"
            );
            self.terminate_remotely(TerminationReason::Reclaimed);
            return;
        }

        if self.view.sync != SyncState::Synced {
            info!(key = %self.key, version = ?version, "Satellite synced");
        }
        self.set_view(SyncState::Synced, RenderState::Live(window));
    }

    /// Fold back into the main window. `false` if a terminal intent was
    /// already sent.
    pub fn pop_in(&mut self) -> bool {
        if !self.latch.fire() {
            return false;
        }
        self.channel.broadcast_popout_pop_in(&self.key);
        info!(key = %self.key, "Satellite popped in");
        self.set_view(SyncState::Terminated(TerminationReason::PoppedIn), RenderState::Closed);
        true
    }

    /// Close the window for good. `false` if a terminal intent was
    /// already sent.
    pub fn close(&mut self) -> bool {
        if !self.latch.fire() {
            return false;
        }
        self.channel.broadcast_popout_closed(&self.key);
        info!(key = %self.key, "Satellite closed");
        self.set_view(SyncState::Terminated(TerminationReason::Closed), RenderState::Closed);
        true
    }

    /// Final cleanup. Sends `POPOUT_POP_IN` unless something terminal
    /// already happened.
    pub fn teardown(self) {
        if self.close_guard().fire() {
            debug!(key = %self.key, "Teardown sent pop-in");
        }
        info!(key = %self.key, state = ?self.view.sync, "Satellite torn down");
    }

    /// Mount and process messages and commands until terminated, then
    /// tear down. Returns the final sync state.
    ///
    /// The command stream closing counts as the window going away.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SatelliteCommand>) -> SyncState {
        let mut subscription = self.mount();
        while !self.view.sync.is_terminated() {
            tokio::select! {
                msg = subscription.recv() => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => {
                        warn!(key = %self.key, "Sync channel closed");
                        break;
                    }
                },
                cmd = commands.recv() => match cmd {
                    Some(SatelliteCommand::PopIn) => {
                        self.pop_in();
                    }
                    Some(SatelliteCommand::Close) => {
                        self.close();
                    }
                    None => break,
                },
            }
        }
        let state = self.view.sync;
        self.teardown();
        state
    }

    /// The registry ended this window. No intent is sent, but the latch is
    /// set so teardown stays quiet.
    fn terminate_remotely(&mut self, reason: TerminationReason) {
        self.latch.fire();
        self.set_view(SyncState::Terminated(reason), RenderState::Closed);
    }

    fn set_view(&mut self, sync: SyncState, render: RenderState) {
        let view = SatelliteView { sync, render };
        if view == self.view {
            return;
        }
        self.view = view.clone();
        self.view_tx.send_replace(view);
    }
}

/// Sends the teardown pop-in from outside the controller, e.g. a ctrl-c
/// handler.
#[derive(Debug, Clone)]
pub struct CloseGuard {
    key: WindowKey,
    channel: SyncChannel,
    latch: TerminalLatch,
}

impl CloseGuard {
    /// Returns `true` if this call sent the intent.
    pub fn fire(&self) -> bool {
        if !self.latch.fire() {
            return false;
        }
        self.channel.broadcast_popout_pop_in(&self.key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_common::{Window, WindowKind};
    use tether_mirror::{MemoryMirror, MirrorPayload};

    fn window(key: &str, state: DisplayState) -> Window {
        Window {
            key: WindowKey::from(key),
            kind: WindowKind::Wallet,
            display_state: state,
            created_at: 1,
        }
    }

    fn update(windows: Vec<Window>, version: u64) -> SyncMessage {
        update_in("E1", windows, version)
    }

    fn update_in(epoch: &str, windows: Vec<Window>, version: u64) -> SyncMessage {
        SyncMessage::WindowStateUpdate {
            windows: RegistrySnapshot::new(windows),
            version: Some(version),
            epoch: Some(epoch.into()),
        }
    }

    fn controller(mirror: MemoryMirror) -> (SatelliteController, SyncChannel) {
        let bus = SyncChannel::in_memory(32);
        let satellite = SatelliteController::new(WindowKey::from("K1"), bus.endpoint(), Arc::new(mirror));
        (satellite, bus)
    }

    fn intents(rx: &mut Subscription) -> Vec<SyncMessage> {
        std::iter::from_fn(|| rx.try_recv())
            .filter(|m| m.is_terminal_intent())
            .collect()
    }

    #[test]
    fn cold_mount_renders_loading_and_requests_sync() {
        let (mut sat, bus) = controller(MemoryMirror::new());
        let mut rx = bus.subscribe();
        assert_eq!(sat.sync_state(), SyncState::ColdStart);

        let _sub = sat.mount();
        assert_eq!(sat.sync_state(), SyncState::AwaitingSync);
        assert_eq!(sat.render_state(), &RenderState::Loading);
        assert_eq!(
            rx.try_recv(),
            Some(SyncMessage::WindowSyncRequest { from: "K1".into() })
        );
    }

    #[test]
    fn warm_mount_renders_stale_window() {
        let mirror = MemoryMirror::with_payload(MirrorPayload::new(
            3,
            RegistrySnapshot::new(vec![window("K1", DisplayState::PoppedOut)]),
        ));
        let (mut sat, _bus) = controller(mirror);
        let _sub = sat.mount();
        assert_eq!(
            sat.render_state(),
            &RenderState::Stale(window("K1", DisplayState::PoppedOut))
        );
    }

    #[test]
    fn update_with_key_goes_live() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.handle_message(update(vec![window("K1", DisplayState::PoppedOut)], 2));
        assert_eq!(sat.sync_state(), SyncState::Synced);
        assert_eq!(
            sat.render_state(),
            &RenderState::Live(window("K1", DisplayState::PoppedOut))
        );
    }

    #[test]
    fn duplicate_update_is_idempotent() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        let msg = update(vec![window("K1", DisplayState::PoppedOut)], 2);
        sat.handle_message(msg.clone());
        let first = sat.render_state().clone();
        sat.handle_message(msg);
        assert_eq!(sat.render_state(), &first);
        assert_eq!(sat.sync_state(), SyncState::Synced);
    }

    #[test]
    fn older_versions_are_discarded() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.handle_message(update(vec![window("K1", DisplayState::PoppedOut)], 5));
        // A late snapshot from before the window existed.
        sat.handle_message(update(vec![], 4));
        assert_eq!(sat.sync_state(), SyncState::Synced);
    }

    #[test]
    fn restarted_registry_is_not_treated_as_stale() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.handle_message(update_in("E1", vec![window("K1", DisplayState::PoppedOut)], 5));

        // New registry, counting from 1 again, without this window.
        sat.handle_message(update_in("E2", vec![], 1));
        assert_eq!(
            sat.sync_state(),
            SyncState::Terminated(TerminationReason::Removed)
        );
    }

    #[test]
    fn versions_are_compared_within_the_new_epoch() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.handle_message(update_in("E1", vec![window("K1", DisplayState::PoppedOut)], 9));
        sat.handle_message(update_in("E2", vec![window("K1", DisplayState::PoppedOut)], 2));
        sat.handle_message(update_in("E2", vec![], 1));
        assert_eq!(sat.sync_state(), SyncState::Synced);
    }

    #[test]
    fn missing_key_terminates_as_removed() {
        let (mut sat, bus) = controller(MemoryMirror::new());
        let mut rx = bus.subscribe();
        let _sub = sat.mount();
        sat.handle_message(update(vec![window("K2", DisplayState::Docked)], 2));
        assert_eq!(
            sat.sync_state(),
            SyncState::Terminated(TerminationReason::Removed)
        );
        assert_eq!(sat.render_state(), &RenderState::Closed);

        sat.teardown();
        assert!(intents(&mut rx).is_empty());
    }

    #[test]
    fn docked_key_while_synced_is_reclaimed() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.handle_message(update(vec![window("K1", DisplayState::PoppedOut)], 2));
        sat.handle_message(update(vec![window("K1", DisplayState::Minimized)], 3));
        assert_eq!(
            sat.sync_state(),
            SyncState::Terminated(TerminationReason::Reclaimed)
        );
    }

    #[test]
    fn messages_after_termination_are_ignored() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let _sub = sat.mount();
        sat.close();
        sat.handle_message(update(vec![window("K1", DisplayState::PoppedOut)], 9));
        assert_eq!(
            sat.sync_state(),
            SyncState::Terminated(TerminationReason::Closed)
        );
    }

    #[test]
    fn close_then_teardown_sends_one_intent() {
        let (mut sat, bus) = controller(MemoryMirror::new());
        let mut rx = bus.subscribe();
        let _sub = sat.mount();

        assert!(sat.close());
        assert!(!sat.pop_in());
        sat.teardown();

        assert_eq!(
            intents(&mut rx),
            vec![SyncMessage::PopoutClosed {
                key: WindowKey::from("K1")
            }]
        );
    }

    #[test]
    fn teardown_alone_sends_pop_in() {
        let (mut sat, bus) = controller(MemoryMirror::new());
        let mut rx = bus.subscribe();
        let _sub = sat.mount();
        sat.teardown();
        assert_eq!(
            intents(&mut rx),
            vec![SyncMessage::PopoutPopIn {
                key: WindowKey::from("K1")
            }]
        );
    }

    #[test]
    fn close_guard_and_controller_share_the_latch() {
        let (mut sat, bus) = controller(MemoryMirror::new());
        let mut rx = bus.subscribe();
        let guard = sat.close_guard();

        assert!(guard.fire());
        assert!(!sat.close());
        sat.teardown();
        assert_eq!(intents(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn watch_follows_transitions() {
        let (mut sat, _bus) = controller(MemoryMirror::new());
        let mut view = sat.watch();
        let _sub = sat.mount();
        assert!(view.has_changed().unwrap());
        assert_eq!(view.borrow_and_update().sync, SyncState::AwaitingSync);

        sat.pop_in();
        assert_eq!(
            view.borrow_and_update().sync,
            SyncState::Terminated(TerminationReason::PoppedIn)
        );
    }
}
