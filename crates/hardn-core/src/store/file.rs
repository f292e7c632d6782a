//! JSON-file store backend.
//!
//! Holds the store image in a [`MemoryStore`] and writes the whole image back
//! to disk after every mutation, so a run that aborts halfway leaves the file
//! consistent with what was actually applied. Used off Windows and for
//! rehearsing a catalog before pointing it at the live registry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{MemoryStore, Store};
use crate::error::{HardnError, StoreError};
use crate::target::{Dword, RuleTarget};

/// On-disk layout of a [`FileStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    values: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    target: RuleTarget,
    value: Dword,
}

/// A [`Store`] persisted as a JSON document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file is
    /// created on the first mutation.
    ///
    /// # Errors
    ///
    /// [`HardnError::Persist`] if the file exists but cannot be read,
    /// [`HardnError::Malformed`] if it is not a valid snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HardnError> {
        let path = path.into();
        let snapshot = match std::fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice::<Snapshot>(&bytes).map_err(|source| {
                    HardnError::Malformed {
                        path: path.clone(),
                        source,
                    }
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(source) => return Err(HardnError::Persist { path, source }),
        };
        tracing::debug!(path = %path.display(), values = snapshot.values.len(), "opened file store");
        let memory = MemoryStore::with_values(
            snapshot
                .values
                .into_iter()
                .map(|entry| (entry.target, entry.value)),
        );
        Ok(Self { path, memory })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory image.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    fn flush(&self) -> std::io::Result<()> {
        let snapshot = Snapshot {
            values: self
                .memory
                .entries()
                .into_iter()
                .map(|(target, value)| SnapshotEntry { target, value })
                .collect(),
        };
        let mut bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        bytes.push(b'\n');
        std::fs::write(&self.path, bytes)
    }

    /// Flush the image. On failure the image is put back to `previous` so it
    /// never holds a value the file does not.
    fn flush_or_revert(&self, target: &RuleTarget, previous: Option<Dword>) -> Result<(), StoreError> {
        self.flush().map_err(|source| {
            let reverted = match previous {
                Some(value) => self.memory.set_value(target, value),
                None => self.memory.delete_value(target),
            };
            if let Err(e) = reverted {
                tracing::warn!(target = %target, error = %e, "could not revert in-memory image");
            }
            StoreError::Access {
                target: target.clone(),
                source,
            }
        })
    }
}

impl Store for FileStore {
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError> {
        self.memory.get_value(target)
    }

    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError> {
        let previous = self.memory.peek(target);
        self.memory.set_value(target, value)?;
        self.flush_or_revert(target, previous)
    }

    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError> {
        let previous = self.memory.peek(target);
        self.memory.delete_value(target)?;
        self.flush_or_revert(target, previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::RootScope;

    fn target() -> RuleTarget {
        RuleTarget::new(RootScope::CurrentUser, "App\\Security", "FeatureFlag").unwrap()
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.memory().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set_value(&target(), 4).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_value(&target()).unwrap(), 4);
    }

    #[test]
    fn delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set_value(&target(), 4).unwrap();
        store.delete_value(&target()).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get_value(&target()).unwrap_err().is_not_found());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, HardnError::Malformed { .. }));
    }

    #[test]
    fn unwritable_location_surfaces_access_error() {
        let dir = tempfile::tempdir().unwrap();
        // The parent directory does not exist, so the flush fails.
        let store = FileStore::open(dir.path().join("missing").join("store.json")).unwrap();
        let err = store.set_value(&target(), 1).unwrap_err();
        assert!(matches!(err, StoreError::Access { .. }));
        assert!(store.get_value(&target()).unwrap_err().is_not_found());
    }

    #[test]
    fn failed_flush_keeps_image_in_step_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let store = FileStore::open(sub.join("store.json")).unwrap();
        store.set_value(&target(), 1).unwrap();

        std::fs::remove_dir_all(&sub).unwrap();
        assert!(store.set_value(&target(), 4).is_err());
        assert_eq!(store.get_value(&target()).unwrap(), 1);
        assert!(store.delete_value(&target()).is_err());
        assert_eq!(store.get_value(&target()).unwrap(), 1);
    }
}
