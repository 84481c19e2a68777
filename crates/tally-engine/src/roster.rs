use std::sync::Mutex;

use tally_store::DocumentStore;
use tally_types::{Document, Member, MemberId};
use tracing::debug;

use crate::eligibility::sorted_members;
use crate::engine::{AttendanceUpdate, Change, Engine};
use crate::error::{EngineError, EngineResult};
use crate::policy::EnginePolicy;

/// Serializes read-modify-write cycles over a [`DocumentStore`].
///
/// Every mutation runs load → transform → save while holding one lock, so
/// concurrent callers cannot overwrite each other's updates. A failed
/// transform saves nothing. Reads load without taking the lock.
pub struct Roster<S> {
    store: S,
    engine: Engine,
    write_lock: Mutex<()>,
}

impl<S: DocumentStore> Roster<S> {
    pub fn new(store: S, policy: EnginePolicy) -> Self {
        Self {
            store,
            engine: Engine::new(policy),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Current document.
    pub fn document(&self) -> EngineResult<Document> {
        Ok(self.store.load()?)
    }

    /// Run `f` against a freshly loaded document and save the result.
    pub fn mutate<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Engine, &mut Document) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| EngineError::Lock(e.to_string()))?;
        let mut doc = self.store.load()?;
        let out = f(&self.engine, &mut doc)?;
        self.store.save(&doc)?;
        debug!(op, store = %self.store.describe(), "mutation committed");
        Ok(out)
    }

    pub fn add_member(&self, name: &str) -> EngineResult<Change> {
        self.mutate("add_member", |e, doc| e.add_member(doc, name))
    }

    pub fn remove_member(&self, name: &str) -> EngineResult<Change> {
        self.mutate("remove_member", |e, doc| e.remove_member(doc, name))
    }

    pub fn rename_member(&self, from: &str, to: &str) -> EngineResult<Change> {
        self.mutate("rename_member", |e, doc| e.rename_member(doc, from, to))
    }

    pub fn add_category(&self, category: &str) -> EngineResult<Change> {
        self.mutate("add_category", |e, doc| e.add_category(doc, category))
    }

    pub fn remove_category(&self, category: &str) -> EngineResult<Change> {
        self.mutate("remove_category", |e, doc| e.remove_category(doc, category))
    }

    pub fn add_item(&self, category: &str, item: &str) -> EngineResult<Change> {
        self.mutate("add_item", |e, doc| e.add_item(doc, category, item))
    }

    pub fn remove_item(&self, category: &str, item: &str) -> EngineResult<Change> {
        self.mutate("remove_item", |e, doc| e.remove_item(doc, category, item))
    }

    pub fn assign_item(&self, member: &str, category: &str, item: &str) -> EngineResult<Change> {
        self.mutate("assign_item", |e, doc| e.assign_item(doc, member, category, item))
    }

    pub fn revoke_item(&self, member: &str, category: &str, item: &str) -> EngineResult<Change> {
        self.mutate("revoke_item", |e, doc| e.revoke_item(doc, member, category, item))
    }

    pub fn update_attendance(&self, updates: &AttendanceUpdate) -> EngineResult<Change> {
        self.mutate("update_attendance", |e, doc| e.update_attendance(doc, updates))
    }

    pub fn update_event_dates<D: AsRef<str>>(&self, raw: &[Option<D>]) -> EngineResult<Change> {
        self.mutate("update_event_dates", |e, doc| e.update_event_dates(doc, raw))
    }

    /// Eligible members for `(category, item)`, ordered by name.
    pub fn eligible(&self, category: &str, item: &str) -> EngineResult<Vec<Member>> {
        let doc = self.store.load()?;
        Ok(self.engine.eligible_members(&doc, category, item))
    }

    /// All members ordered by name.
    pub fn members(&self) -> EngineResult<Vec<Member>> {
        Ok(sorted_members(&self.store.load()?))
    }

    /// The member with this id, whatever its current name.
    pub fn member(&self, id: &MemberId) -> EngineResult<Member> {
        self.store
            .load()?
            .member_by_id(id)
            .cloned()
            .ok_or_else(|| EngineError::MemberNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tally_store::{InMemoryDocumentStore, JsonFileStore, SnapshotStore, SnapshotWrites, StoreError};

    fn roster() -> Roster<InMemoryDocumentStore> {
        Roster::new(InMemoryDocumentStore::new(), EnginePolicy::default())
    }

    #[test]
    fn mutations_persist() {
        let r = roster();
        r.add_category("Clothing").unwrap();
        r.add_item("Clothing", "Coat").unwrap();
        r.add_member("Alice").unwrap();
        r.assign_item("Alice", "Clothing", "Coat").unwrap();

        let doc = r.document().unwrap();
        assert!(doc.member("Alice").unwrap().holds("Clothing", "Coat"));
        assert_eq!(r.store().save_count(), 4);
    }

    #[test]
    fn every_mutation_rewrites_document() {
        let r = roster();
        r.add_category("Clothing").unwrap();
        assert_eq!(r.add_category("Clothing").unwrap(), Change::Unchanged);
        assert_eq!(r.store().save_count(), 2);
    }

    #[test]
    fn failed_transform_saves_nothing() {
        let r = Roster::new(InMemoryDocumentStore::new(), EnginePolicy::strict());
        assert!(r.assign_item("Zed", "Clothing", "Coat").is_err());
        assert_eq!(r.store().save_count(), 0);
    }

    #[test]
    fn eligibility_end_to_end() {
        let r = roster();
        r.add_category("Clothing").unwrap();
        r.add_item("Clothing", "Coat").unwrap();
        for name in ["Bob", "Alice"] {
            r.add_member(name).unwrap();
            r.assign_item(name, "Clothing", "Coat").unwrap();
        }
        let mut updates = AttendanceUpdate::new();
        updates.insert("Alice".into(), vec![true, true, true, true].into());
        updates.insert("Bob".into(), vec![true, true, true].into());
        r.update_attendance(&updates).unwrap();

        let eligible = r.eligible("Clothing", "Coat").unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, "Alice");

        let members: Vec<String> = r.members().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(members, ["Alice", "Bob"]);
    }

    #[test]
    fn member_lookup_follows_renames() {
        let r = roster();
        r.add_member("Alice").unwrap();
        let id = r.members().unwrap()[0].id;
        r.rename_member("Alice", "Alicia").unwrap();
        assert_eq!(r.member(&id).unwrap().name, "Alicia");

        r.remove_member("Alicia").unwrap();
        assert!(matches!(r.member(&id), Err(EngineError::MemberNotFound(_))));
    }

    #[test]
    fn concurrent_mutations_are_not_lost() {
        let r = Arc::new(roster());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let r = Arc::clone(&r);
                thread::spawn(move || r.add_member(&format!("member-{i:02}")).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(r.document().unwrap().members.len(), 16);
    }

    #[test]
    fn file_backed_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        {
            let r = Roster::new(JsonFileStore::new(&path), EnginePolicy::default());
            r.add_member("Alice").unwrap();
            r.update_event_dates(&[Some("2024-05-04")]).unwrap();
        }
        let r = Roster::new(JsonFileStore::new(&path), EnginePolicy::default());
        let doc = r.document().unwrap();
        assert!(doc.has_member("Alice"));
        assert_eq!(doc.event_dates.scheduled(), 1);
    }

    #[test]
    fn read_only_snapshot() {
        let discard = Roster::new(
            SnapshotStore::from_document(Document::new(), SnapshotWrites::Discard),
            EnginePolicy::default(),
        );
        assert_eq!(discard.add_member("Alice").unwrap(), Change::Applied);
        assert!(discard.document().unwrap().members.is_empty());

        let reject = Roster::new(
            SnapshotStore::from_document(Document::new(), SnapshotWrites::Reject),
            EnginePolicy::default(),
        );
        assert!(matches!(
            reject.add_member("Alice"),
            Err(EngineError::Store(StoreError::ReadOnly))
        ));
    }
}
