use std::sync::{Arc, RwLock};

use tether_common::MirrorError;

use crate::{MirrorPayload, MirrorStore};

/// In-process mirror. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryMirror {
    slot: Arc<RwLock<Option<MirrorPayload>>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror pre-seeded with a payload.
    pub fn with_payload(payload: MirrorPayload) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(payload))),
        }
    }
}

impl MirrorStore for MemoryMirror {
    fn read(&self) -> Option<MirrorPayload> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self, payload: &MirrorPayload) -> Result<(), MirrorError> {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(payload.clone());
        Ok(())
    }
}
