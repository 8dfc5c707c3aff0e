//! Satellite window controller.
//!
//! A satellite shows one popped-out window in its own process. It renders
//! from the mirror until the registry answers its sync request, follows
//! live updates, and sends at most one terminal intent
//! (`POPOUT_POP_IN` or `POPOUT_CLOSED`) over its lifetime.

mod controller;
mod latch;
mod state;

pub use controller::{CloseGuard, SatelliteCommand, SatelliteController};
pub use latch::TerminalLatch;
pub use state::{RenderState, SatelliteView, SyncState, TerminationReason};
