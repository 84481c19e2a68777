use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use tally_types::Document;

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// In-memory document store.
///
/// Intended for tests and embedding. The document is cloned on every load
/// and save, so callers never share state with the store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    document: RwLock<Document>,
    saves: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Create a store holding an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self) -> StoreResult<Document> {
        let doc = self
            .document
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(doc.clone())
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let mut doc = self
            .document
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        *doc = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
