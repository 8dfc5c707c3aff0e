use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::KindError;
use crate::id::WindowKey;

use super::kind::{KindParams, WindowKind};

/// Where a window is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayState {
    Docked,
    PoppedOut,
    Minimized,
    Closed,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayState::Docked => "docked",
            DisplayState::PoppedOut => "popped-out",
            DisplayState::Minimized => "minimized",
            DisplayState::Closed => "closed",
        }
    }
}

/// A logical window. Serialized as
/// `{ key, kind, kindParams, displayState, createdAt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireWindow", into = "WireWindow")]
pub struct Window {
    pub key: WindowKey,
    pub kind: WindowKind,
    pub display_state: DisplayState,
    pub created_at: u64,
}

impl Window {
    pub fn is_singleton(&self) -> bool {
        self.kind.is_singleton()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWindow {
    key: WindowKey,
    kind: String,
    #[serde(default)]
    kind_params: KindParams,
    display_state: DisplayState,
    created_at: u64,
}

impl TryFrom<WireWindow> for Window {
    type Error = KindError;

    fn try_from(wire: WireWindow) -> Result<Self, Self::Error> {
        Ok(Window {
            key: wire.key,
            kind: WindowKind::from_parts(&wire.kind, wire.kind_params)?,
            display_state: wire.display_state,
            created_at: wire.created_at,
        })
    }
}

impl From<Window> for WireWindow {
    fn from(window: Window) -> Self {
        WireWindow {
            key: window.key,
            kind: window.kind.name().to_string(),
            kind_params: window.kind.params(),
            display_state: window.display_state,
            created_at: window.created_at,
        }
    }
}

/// Full ordered state of all live windows at one instant.
///
/// Windows are kept sorted by `created_at`. A snapshot is never edited
/// after it has been handed out; mutations build a new one. Decoding goes
/// through [`RegistrySnapshot::new`] as well, and drops windows of kinds
/// this build does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    windows: Vec<Window>,
}

impl Serialize for RegistrySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.windows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RegistrySnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<SnapshotEntry>::deserialize(deserializer)?;
        Ok(RegistrySnapshot::new(
            entries.into_iter().filter_map(|entry| entry.0).collect(),
        ))
    }
}

/// One decoded snapshot element. `None` for a window of an unknown kind.
struct SnapshotEntry(Option<Window>);

impl<'de> Deserialize<'de> for SnapshotEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireWindow::deserialize(deserializer)?;
        match Window::try_from(wire) {
            Ok(window) => Ok(SnapshotEntry(Some(window))),
            Err(KindError::UnknownKind(kind)) => {
                tracing::debug!(kind = %kind, "Skipping window of unknown kind");
                Ok(SnapshotEntry(None))
            }
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

impl RegistrySnapshot {
    pub fn new(mut windows: Vec<Window>) -> Self {
        windows.retain(|w| w.display_state != DisplayState::Closed);
        windows.sort_by_key(|w| w.created_at);
        Self { windows }
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn find(&self, key: &WindowKey) -> Option<&Window> {
        self.windows.iter().find(|w| &w.key == key)
    }

    pub fn contains(&self, key: &WindowKey) -> bool {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    pub fn into_windows(self) -> Vec<Window> {
        self.windows
    }
}

impl<'a> IntoIterator for &'a RegistrySnapshot {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}
