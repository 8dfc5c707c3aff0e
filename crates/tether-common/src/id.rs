use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque identifier of a window, stable across pop-out/pop-in cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WindowKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WindowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WindowKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
