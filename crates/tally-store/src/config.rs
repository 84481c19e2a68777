use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::file::JsonFileStore;
use crate::memory::InMemoryDocumentStore;
use crate::snapshot::{SnapshotStore, SnapshotWrites};
use crate::traits::DocumentStore;

/// Which backend holds the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Volatile in-process document.
    Memory,
    /// Read-write JSON file.
    File { path: PathBuf },
    /// Read-only JSON snapshot.
    Snapshot {
        path: PathBuf,
        #[serde(default)]
        writes: SnapshotWrites,
        #[serde(default)]
        fallback_to_empty: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("db.json"),
        }
    }
}

/// Open the configured backend.
pub fn open_store(config: &StorageConfig) -> StoreResult<Box<dyn DocumentStore>> {
    let store: Box<dyn DocumentStore> = match config {
        StorageConfig::Memory => Box::new(InMemoryDocumentStore::new()),
        StorageConfig::File { path } => Box::new(JsonFileStore::new(path.clone())),
        StorageConfig::Snapshot {
            path,
            writes,
            fallback_to_empty,
        } => {
            if *fallback_to_empty {
                Box::new(SnapshotStore::open_or_empty(path, *writes))
            } else {
                Box::new(SnapshotStore::open(path, *writes)?)
            }
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_db_json() {
        assert_eq!(
            StorageConfig::default(),
            StorageConfig::File { path: "db.json".into() }
        );
    }

    #[test]
    fn parse_from_toml() {
        let c: StorageConfig = toml::from_str(
            r#"
            backend = "snapshot"
            path = "/srv/db.json"
            writes = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(
            c,
            StorageConfig::Snapshot {
                path: "/srv/db.json".into(),
                writes: SnapshotWrites::Reject,
                fallback_to_empty: false,
            }
        );

        let m: StorageConfig = toml::from_str(r#"backend = "memory""#).unwrap();
        assert_eq!(m, StorageConfig::Memory);
    }

    #[test]
    fn open_each_backend() {
        let dir = tempfile::tempdir().unwrap();
        let file = open_store(&StorageConfig::File { path: dir.path().join("db.json") }).unwrap();
        assert!(!file.is_read_only());

        let mem = open_store(&StorageConfig::Memory).unwrap();
        assert_eq!(mem.describe(), "memory");

        let snap = open_store(&StorageConfig::Snapshot {
            path: dir.path().join("missing.json"),
            writes: SnapshotWrites::Discard,
            fallback_to_empty: true,
        })
        .unwrap();
        assert!(snap.is_read_only());

        assert!(open_store(&StorageConfig::Snapshot {
            path: dir.path().join("missing.json"),
            writes: SnapshotWrites::Discard,
            fallback_to_empty: false,
        })
        .is_err());
    }
}
