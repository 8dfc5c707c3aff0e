use tether_common::Window;

/// Where a satellite is in its sync handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Mirror not read yet.
    ColdStart,
    /// Sync request sent, no update naming this key seen yet.
    AwaitingSync,
    Synced,
    Terminated(TerminationReason),
}

impl SyncState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, SyncState::Terminated(_))
    }
}

/// Why a satellite stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The registry no longer has this window.
    Removed,
    /// The main window took the window back while this satellite was live.
    Reclaimed,
    /// The user folded the satellite back in.
    PoppedIn,
    /// The user closed the satellite.
    Closed,
}

/// What the satellite currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    /// From the mirror; may be out of date.
    Stale(Window),
    Live(Window),
    Closed,
}

impl RenderState {
    pub fn window(&self) -> Option<&Window> {
        match self {
            RenderState::Stale(w) | RenderState::Live(w) => Some(w),
            RenderState::Loading | RenderState::Closed => None,
        }
    }
}

/// Observable state of a satellite, published on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatelliteView {
    pub sync: SyncState,
    pub render: RenderState,
}

impl Default for SatelliteView {
    fn default() -> Self {
        Self {
            sync: SyncState::ColdStart,
            render: RenderState::Loading,
        }
    }
}
