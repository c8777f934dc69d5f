//! Snapshot persistence port for entity stores.
//!
//! A [`SnapshotStore`] durably holds one serialized collection per string key
//! (`"orders"`, `"products"`). The port moves opaque blobs only: the entity
//! store owns serialization, defaulting, and the absent-or-unparsable
//! fallback. `load` never fails for a missing key; it simply returns `None`.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::warn;

/// Errors surfaced by snapshot writes.
///
/// Callers log these and keep their in-memory state; a failed write degrades
/// durability for the session, never the session itself.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable slot for named, serialized collections.
pub trait SnapshotStore: Send {
    /// Returns the blob stored under `key`, or `None` if the key was never
    /// written. A missing key is the normal first-run case, not an error.
    fn load(&self, key: &str) -> Option<String>;

    /// Overwrites the full blob under `key`. No batching, no partial writes.
    fn save(&self, key: &str, blob: &str) -> Result<(), PersistenceError>;
}

/// One file per key under an injected root directory.
///
/// The per-user analogue of per-origin browser storage: snapshots survive
/// restarts of the same installation but are never shared across machines.
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "Snapshot unreadable, treating as absent");
                None
            }
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.slot_path(key), blob)?;
        Ok(())
    }
}

/// In-memory snapshot slots, shared across clones.
///
/// Clones see each other's writes, so a test can hand one clone to a store
/// and observe write-through from the outside, or simulate a reload by
/// constructing a second store over the same slots.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct MemorySnapshotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_a_blob() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = FileSnapshotStore::new(temp.path());

        store.save("orders", r#"[{"id":"1"}]"#).expect("save");
        assert_eq!(store.load("orders").as_deref(), Some(r#"[{"id":"1"}]"#));
    }

    #[test]
    fn file_store_load_of_missing_key_is_none() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = FileSnapshotStore::new(temp.path().join("never-created"));

        assert_eq!(store.load("orders"), None);
    }

    #[test]
    fn file_store_save_overwrites_previous_blob() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = FileSnapshotStore::new(temp.path());

        store.save("products", "[]").expect("save");
        store.save("products", r#"[{"id":"2"}]"#).expect("overwrite");
        assert_eq!(store.load("products").as_deref(), Some(r#"[{"id":"2"}]"#));
    }

    #[test]
    fn memory_store_clones_share_slots() {
        let store = MemorySnapshotStore::default();
        let observer = store.clone();

        store.save("orders", "[]").expect("save");
        assert_eq!(observer.load("orders").as_deref(), Some("[]"));
    }
}
