use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_types::Document;
use tracing::{error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// What a [`SnapshotStore`] does with a save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotWrites {
    /// Accept the save and drop it with a warning.
    #[default]
    Discard,
    /// Fail the save with [`StoreError::ReadOnly`].
    Reject,
}

/// Read-only store serving a document published elsewhere.
///
/// The document is read once at open time. Mutating operations still run
/// against loaded copies, but nothing is persisted upstream.
#[derive(Debug)]
pub struct SnapshotStore {
    snapshot: Document,
    source: String,
    writes: SnapshotWrites,
}

impl SnapshotStore {
    /// Serve an already-loaded document.
    pub fn from_document(snapshot: Document, writes: SnapshotWrites) -> Self {
        Self {
            snapshot,
            source: "inline".to_string(),
            writes,
        }
    }

    /// Load the snapshot from a JSON file.
    pub fn open(path: &Path, writes: SnapshotWrites) -> StoreResult<Self> {
        let bytes = fs::read(path)?;
        let snapshot: Document =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            members = snapshot.members.len(),
            "snapshot loaded"
        );
        Ok(Self {
            snapshot,
            source: path.display().to_string(),
            writes,
        })
    }

    /// Like [`open`](Self::open), but an unreadable snapshot is logged and
    /// replaced by an empty document.
    pub fn open_or_empty(path: &Path, writes: SnapshotWrites) -> Self {
        match Self::open(path, writes) {
            Ok(store) => store,
            Err(e) => {
                error!(path = %path.display(), error = %e, "snapshot unreadable; serving empty document");
                Self {
                    snapshot: Document::new(),
                    source: path.display().to_string(),
                    writes,
                }
            }
        }
    }
}

impl DocumentStore for SnapshotStore {
    fn load(&self) -> StoreResult<Document> {
        Ok(self.snapshot.clone())
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        match self.writes {
            SnapshotWrites::Discard => {
                warn!(
                    source = %self.source,
                    members = document.members.len(),
                    "snapshot store is read-only; save discarded"
                );
                Ok(())
            }
            SnapshotWrites::Reject => Err(StoreError::ReadOnly),
        }
    }

    fn describe(&self) -> String {
        format!("snapshot:{}", self.source)
    }

    fn is_read_only(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::Member;

    fn seeded() -> Document {
        let mut doc = Document::new();
        doc.members.push(Member::new("Alice"));
        doc
    }

    #[test]
    fn discard_keeps_snapshot() {
        let store = SnapshotStore::from_document(seeded(), SnapshotWrites::Discard);
        let mut doc = store.load().unwrap();
        doc.members.clear();
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap().members.len(), 1);
        assert!(store.is_read_only());
    }

    #[test]
    fn reject_fails_save() {
        let store = SnapshotStore::from_document(seeded(), SnapshotWrites::Reject);
        assert!(matches!(
            store.save(&Document::new()),
            Err(StoreError::ReadOnly)
        ));
    }

    #[test]
    fn open_reads_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, serde_json::to_vec(&seeded()).unwrap()).unwrap();

        let store = SnapshotStore::open(&path, SnapshotWrites::Discard).unwrap();
        fs::write(&path, "{}").unwrap();
        assert_eq!(store.load().unwrap().members.len(), 1);
        assert!(store.describe().starts_with("snapshot:"));
    }

    #[test]
    fn open_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            SnapshotStore::open(&path, SnapshotWrites::Discard),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn open_or_empty_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "garbage").unwrap();
        let store = SnapshotStore::open_or_empty(&path, SnapshotWrites::Discard);
        assert_eq!(store.load().unwrap(), Document::new());
    }
}
