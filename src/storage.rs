// ============================================================================
// BLOB STORE — persistent key-value storage for canvas/window state
// ============================================================================
//
// The editor persists a handful of opaque encoded strings: the autosaved
// canvas (a share payload) and the container window's geometry. The store
// is a plain get/set by string key with no transactional guarantees; the
// file-backed implementation writes one file per key under the app's data
// directory, and the in-memory one backs tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Autosaved canvas payload (ShareCodec string).
pub const KEY_CANVAS: &str = "canvas";
/// Container window size, encoded by the shell.
pub const KEY_WINDOW_SIZE: &str = "window-size";
/// Container window position, encoded by the shell.
pub const KEY_WINDOW_POS: &str = "window-pos";

pub trait BlobStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// File-per-key store rooted in the platform data directory.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Store under `<data dir>/RetroPaint/state/`.
    pub fn open_default() -> Result<Self, String> {
        Self::open(crate::logger::data_dir().join("RetroPaint").join("state"))
    }

    pub fn open(root: PathBuf) -> Result<Self, String> {
        fs::create_dir_all(&root)
            .map_err(|e| format!("could not create blob store at {}: {}", root.display(), e))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are our own constants, but sanitize anyway so a stray key
        // cannot escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.blob", safe))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::write(&path, value) {
            crate::log_warn!("blob store write failed for {}: {}", path.display(), e);
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBlobStore {
    values: HashMap<String, String>,
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryBlobStore::default();
        assert_eq!(store.get(KEY_CANVAS), None);
        store.set(KEY_CANVAS, "payload");
        store.set(KEY_CANVAS, "payload2");
        assert_eq!(store.get(KEY_CANVAS).as_deref(), Some("payload2"));
    }
}
