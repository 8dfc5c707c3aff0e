//! Wire protocol for the window broadcast channel.
//!
//! Every message is a JSON object tagged by `type`:
//! - **Registry -> satellites**: `WINDOW_STATE_UPDATE` carries a full snapshot.
//! - **Satellite -> registry**: `WINDOW_SYNC_REQUEST` asks for a re-push;
//!   `POPOUT_CLOSED` / `POPOUT_POP_IN` are terminal intents.
//!
//! Unknown `type` values decode to [`SyncMessage::Unknown`] so older
//! processes keep working next to newer ones. Messages with missing fields
//! fail to decode and are dropped by [`SyncMessage::from_json`].

use serde::{Deserialize, Serialize};

use crate::id::WindowKey;
use crate::types::RegistrySnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncMessage {
    #[serde(rename = "WINDOW_STATE_UPDATE")]
    WindowStateUpdate {
        windows: RegistrySnapshot,
        /// Mirror version of this snapshot; absent from older senders.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<u64>,
        /// Registry instance the version belongs to. A restarted registry
        /// picks a new epoch, and versions are only compared within one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        epoch: Option<String>,
    },

    #[serde(rename = "WINDOW_SYNC_REQUEST")]
    WindowSyncRequest { from: String },

    #[serde(rename = "POPOUT_CLOSED")]
    PopoutClosed { key: WindowKey },

    #[serde(rename = "POPOUT_POP_IN")]
    PopoutPopIn { key: WindowKey },

    #[serde(other)]
    Unknown,
}

impl SyncMessage {
    /// Parse a raw frame. Malformed frames yield `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed sync message");
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SyncMessage::WindowStateUpdate { .. } => "WINDOW_STATE_UPDATE",
            SyncMessage::WindowSyncRequest { .. } => "WINDOW_SYNC_REQUEST",
            SyncMessage::PopoutClosed { .. } => "POPOUT_CLOSED",
            SyncMessage::PopoutPopIn { .. } => "POPOUT_POP_IN",
            SyncMessage::Unknown => "UNKNOWN",
        }
    }

    /// Terminal intents end a satellite's lifetime.
    pub fn is_terminal_intent(&self) -> bool {
        matches!(
            self,
            SyncMessage::PopoutClosed { .. } | SyncMessage::PopoutPopIn { .. }
        )
    }
}
