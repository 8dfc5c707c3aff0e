//! Persistent mirror of the window registry.
//!
//! A single durable slot holding the latest published snapshot as
//! `{ version, windows }`. Satellites read it to render something before
//! a live sync arrives; only the registry writes it. The mirror is a
//! cache: unreadable or malformed payloads read as a miss.

mod file;
mod memory;
mod payload;

pub use file::FileMirror;
pub use memory::MemoryMirror;
pub use payload::MirrorPayload;

use tether_common::{MirrorError, Window, WindowKey};

/// Storage seam for the mirror slot.
pub trait MirrorStore: Send + Sync {
    /// Latest payload, or `None` when absent or unreadable.
    fn read(&self) -> Option<MirrorPayload>;

    /// Replace the slot. Callers treat failures as non-fatal.
    fn write(&self, payload: &MirrorPayload) -> Result<(), MirrorError>;

    /// Look up a single window in the mirrored snapshot.
    fn get_window_by_key(&self, key: &WindowKey) -> Option<Window> {
        self.read()?.windows.find(key).cloned()
    }

    /// Version of the mirrored snapshot, `0` on a miss.
    fn version(&self) -> u64 {
        self.read().map(|p| p.version).unwrap_or(0)
    }
}
