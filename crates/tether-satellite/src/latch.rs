use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-shot flag guarding a satellite's terminal intent.
///
/// Clones share the flag, so the controller and an OS close handler can
/// race on it and exactly one of them wins.
#[derive(Debug, Clone, Default)]
pub struct TerminalLatch(Arc<AtomicBool>);

impl TerminalLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch. Returns `true` only for the first caller.
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_fired(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
