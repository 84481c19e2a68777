//! Whole-document storage for Tally.
//!
//! The entire application state is one [`Document`](tally_types::Document).
//! A store loads it in full and replaces it in full; there are no partial
//! writes and no per-record access.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `RwLock`-guarded document for tests and embedding
//! - [`JsonFileStore`] -- pretty-printed JSON file, replaced atomically on save
//! - [`SnapshotStore`] -- read-only document loaded once; saves are dropped or rejected
//!
//! # Design Rules
//!
//! 1. `load` always returns a complete document; a missing file is an empty one.
//! 2. `save` replaces the whole document atomically from the caller's view.
//! 3. Stores do no locking across load/save. Serializing read-modify-write
//!    cycles is the caller's job (see `tally-engine`'s `Roster`).
//! 4. I/O and decode errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use config::{open_store, StorageConfig};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
pub use snapshot::{SnapshotStore, SnapshotWrites};
pub use traits::DocumentStore;
