use std::sync::Arc;

use tally_types::Document;

use crate::error::StoreResult;

/// Whole-document store.
///
/// Implementations must satisfy these invariants:
/// - `load` returns the full document as of the last successful `save`.
/// - `save` replaces the full document; a reader never observes a mix of
///   old and new content.
/// - No locking is implied between a `load` and a later `save`: two callers
///   interleaving load/save will lose one update (last writer wins).
pub trait DocumentStore: Send + Sync {
    /// Read the current document.
    fn load(&self) -> StoreResult<Document>;

    /// Replace the stored document.
    fn save(&self, document: &Document) -> StoreResult<()>;

    /// Short human-readable description of the backend, for logs.
    fn describe(&self) -> String;

    /// Whether saves are discarded or rejected.
    fn is_read_only(&self) -> bool {
        false
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}
