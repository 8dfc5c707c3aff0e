//! Registry mutations. Each one publishes exactly once when it changes
//! something and not at all when it doesn't.

use std::time::{SystemTime, UNIX_EPOCH};

use tether_common::{DisplayState, Window, WindowKey, WindowKind};
use tracing::{debug, info};

use super::WindowRegistry;

impl WindowRegistry {
    /// Open a window of `kind` and return its key.
    ///
    /// A singleton kind that is already open returns the existing key. If
    /// that window was minimized it is brought back to docked; otherwise
    /// nothing changes.
    pub fn add_window(&mut self, kind: WindowKind) -> WindowKey {
        if kind.is_singleton() {
            if let Some(idx) = self.windows.iter().position(|w| w.kind.same_kind(&kind)) {
                let window = &mut self.windows[idx];
                let key = window.key.clone();
                if window.display_state == DisplayState::Minimized {
                    window.display_state = DisplayState::Docked;
                    info!(key = %key, kind = %kind, "Restored minimized window");
                    self.publish();
                } else {
                    debug!(key = %key, kind = %kind, "Singleton already open");
                }
                return key;
            }
        }

        let key = WindowKey::new();
        let created_at = self.next_created_at();
        info!(key = %key, kind = %kind, "Window added");
        self.windows.push(Window {
            key: key.clone(),
            kind,
            display_state: DisplayState::Docked,
            created_at,
        });
        self.publish();
        key
    }

    /// Remove a window. Returns `false` if the key is unknown.
    pub fn remove_window(&mut self, key: &WindowKey) -> bool {
        let Some(idx) = self.position(key) else {
            debug!(key = %key, "Remove ignored, no such window");
            return false;
        };
        let window = self.windows.remove(idx);
        info!(key = %key, kind = %window.kind, "Window removed");
        self.publish();
        true
    }

    /// Remove every window. Returns how many were removed.
    pub fn remove_all_windows(&mut self) -> usize {
        let removed = self.windows.len();
        if removed == 0 {
            return 0;
        }
        self.windows.clear();
        info!(removed, "All windows removed");
        self.publish();
        removed
    }

    /// Move a docked window to minimized.
    pub fn minimize_window(&mut self, key: &WindowKey) -> bool {
        self.set_display_state(key, DisplayState::Minimized)
    }

    /// Minimize every docked window. Popped-out windows keep their
    /// satellite. Returns how many changed.
    pub fn minimize_all_windows(&mut self) -> usize {
        let mut changed = 0;
        for window in self
            .windows
            .iter_mut()
            .filter(|w| w.display_state == DisplayState::Docked)
        {
            window.display_state = DisplayState::Minimized;
            changed += 1;
        }
        if changed > 0 {
            info!(changed, "Docked windows minimized");
            self.publish();
        }
        changed
    }

    /// Hand a window off to a satellite.
    pub fn pop_out_window(&mut self, key: &WindowKey) -> bool {
        self.set_display_state(key, DisplayState::PoppedOut)
    }

    /// Fold a window back into the main surface, keeping its key.
    pub fn dock_window(&mut self, key: &WindowKey) -> bool {
        self.set_display_state(key, DisplayState::Docked)
    }

    /// Set a window's display state. `Closed` removes it.
    ///
    /// Returns `true` only when the registry changed.
    pub fn set_display_state(&mut self, key: &WindowKey, state: DisplayState) -> bool {
        if state == DisplayState::Closed {
            return self.remove_window(key);
        }
        let Some(idx) = self.position(key) else {
            debug!(key = %key, state = state.as_str(), "State change ignored, no such window");
            return false;
        };
        let window = &mut self.windows[idx];
        if window.display_state == state {
            return false;
        }
        let from = window.display_state;
        window.display_state = state;
        info!(
            key = %key,
            from = from.as_str(),
            to = state.as_str(),
            "Window display state changed"
        );
        self.publish();
        true
    }

    /// Wall-clock millis, bumped so no two windows share a timestamp.
    fn next_created_at(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_created_at = now.max(self.last_created_at + 1);
        self.last_created_at
    }
}
