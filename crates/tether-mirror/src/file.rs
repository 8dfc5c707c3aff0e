//! File-backed mirror shared by every window process on the device.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tether_common::MirrorError;
use tracing::{debug, warn};

use crate::{MirrorPayload, MirrorStore};

/// Mirror stored as a JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the
/// target, so a concurrent reader sees either the old or the new
/// payload, never a torn one.
#[derive(Debug, Clone)]
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "window-mirror.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, source: std::io::Error) -> MirrorError {
        MirrorError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl MirrorStore for FileMirror {
    fn read(&self) -> Option<MirrorPayload> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Mirror not found, cold start");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Mirror unreadable, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Mirror payload malformed, treating as miss");
                None
            }
        }
    }

    fn write(&self, payload: &MirrorPayload) -> Result<(), MirrorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
            }
        }

        let json = serde_json::to_string(payload)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.write_failed(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.write_failed(e)
        })?;

        debug!(path = %self.path.display(), version = payload.version, "Mirror written");
        Ok(())
    }
}
