use std::collections::BTreeMap;

use tally_types::{Attendance, AttendanceInput, Document, EventDates, Member};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::policy::{AbsentAttendance, EnginePolicy, ItemScope, NamePolicy};

/// Raw attendance slots keyed by member name.
pub type AttendanceUpdate = BTreeMap<String, AttendanceInput>;

/// Whether an operation changed the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Applied,
    Unchanged,
}

impl Change {
    fn from_flag(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }

    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Applies mutations and queries to a [`Document`] under an [`EnginePolicy`].
#[derive(Clone, Debug, Default)]
pub struct Engine {
    policy: EnginePolicy,
}

/// Names are stored trimmed; a name that trims to nothing is rejected.
fn require_name<'a>(value: &'a str, what: &'static str) -> EngineResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyName(what));
    }
    Ok(trimmed)
}

impl Engine {
    pub fn new(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// A missing reference is an error when strict, otherwise a no-op.
    fn missing(&self, err: EngineError) -> EngineResult<Change> {
        if self.policy.strict_references {
            Err(err)
        } else {
            debug!(reason = %err, "ignoring operation on missing reference");
            Ok(Change::Unchanged)
        }
    }

    // ---- Members ----

    pub fn add_member(&self, doc: &mut Document, name: &str) -> EngineResult<Change> {
        let name = require_name(name, "member name")?;
        if self.policy.member_names == NamePolicy::Unique && doc.has_member(name) {
            return self.refuse_duplicate(name);
        }
        doc.members.push(Member::new(name));
        debug!(member = name, "member added");
        Ok(Change::Applied)
    }

    fn refuse_duplicate(&self, name: &str) -> EngineResult<Change> {
        if self.policy.strict_references {
            Err(EngineError::DuplicateMember(name.to_string()))
        } else {
            debug!(member = name, "member exists; add ignored");
            Ok(Change::Unchanged)
        }
    }

    /// Removes every member with exactly this name.
    pub fn remove_member(&self, doc: &mut Document, name: &str) -> EngineResult<Change> {
        let before = doc.members.len();
        doc.members.retain(|m| m.name != name);
        let removed = before - doc.members.len();
        if removed == 0 {
            return self.missing(EngineError::MemberNotFound(name.to_string()));
        }
        debug!(member = name, removed, "member removed");
        Ok(Change::Applied)
    }

    /// Changes a member's display name. The member id is kept, so
    /// assignments and attendance follow the member.
    ///
    /// Renaming onto another member's name is refused under
    /// [`NamePolicy::Unique`] regardless of strictness: silently merging two
    /// people is never a no-op.
    pub fn rename_member(&self, doc: &mut Document, from: &str, to: &str) -> EngineResult<Change> {
        let to = require_name(to, "member name")?;
        if from == to {
            return Ok(Change::Unchanged);
        }
        if self.policy.member_names == NamePolicy::Unique && doc.has_member(to) {
            return Err(EngineError::DuplicateMember(to.to_string()));
        }
        match doc.member_mut(from) {
            Some(member) => {
                member.name = to.to_string();
                debug!(id = %member.id, from, to, "member renamed");
                Ok(Change::Applied)
            }
            None => self.missing(EngineError::MemberNotFound(from.to_string())),
        }
    }

    // ---- Categories ----

    pub fn add_category(&self, doc: &mut Document, category: &str) -> EngineResult<Change> {
        let category = require_name(category, "category")?;
        Ok(Change::from_flag(doc.categories.add_category(category)))
    }

    /// Deletes the category and every member's assignments under it.
    pub fn remove_category(&self, doc: &mut Document, category: &str) -> EngineResult<Change> {
        let listed = doc.categories.remove_category(category);
        if !listed && self.policy.strict_references {
            return Err(EngineError::CategoryNotFound(category.to_string()));
        }
        // Cascade even when unlisted so orphaned member entries are cleared.
        let cascaded = doc
            .members
            .iter_mut()
            .map(|m| m.drop_category(category))
            .filter(|dropped| *dropped)
            .count();
        debug!(category, listed, cascaded, "category removed");
        Ok(Change::from_flag(listed || cascaded > 0))
    }

    // ---- Items ----

    pub fn add_item(&self, doc: &mut Document, category: &str, item: &str) -> EngineResult<Change> {
        let item = require_name(item, "item")?;
        match doc.categories.add_item(category, item) {
            Some(added) => Ok(Change::from_flag(added)),
            None => self.missing(EngineError::CategoryNotFound(category.to_string())),
        }
    }

    /// Deletes the item from the category's catalog and from member
    /// assignments, as far as [`EnginePolicy::removal_scope`] reaches.
    pub fn remove_item(&self, doc: &mut Document, category: &str, item: &str) -> EngineResult<Change> {
        if self.policy.strict_references {
            if !doc.categories.contains(category) {
                return Err(EngineError::CategoryNotFound(category.to_string()));
            }
            if !doc.categories.contains_item(category, item) {
                return Err(EngineError::ItemNotFound {
                    category: category.to_string(),
                    item: item.to_string(),
                });
            }
        }
        let listed = doc.categories.remove_item(category, item);
        let cascaded: usize = doc
            .members
            .iter_mut()
            .map(|m| match self.policy.removal_scope {
                ItemScope::Category => usize::from(m.revoke(category, item)),
                ItemScope::AnyCategory => m.revoke_everywhere(item),
            })
            .sum();
        debug!(category, item, listed, cascaded, "item removed");
        Ok(Change::from_flag(listed || cascaded > 0))
    }

    // ---- Assignments ----

    /// Assigns `item` to the member under `category`.
    ///
    /// Leniently, the category and item need not be in the catalog; when
    /// strict, both must be.
    pub fn assign_item(
        &self,
        doc: &mut Document,
        member: &str,
        category: &str,
        item: &str,
    ) -> EngineResult<Change> {
        let item = require_name(item, "item")?;
        if self.policy.strict_references {
            if !doc.categories.contains(category) {
                return Err(EngineError::CategoryNotFound(category.to_string()));
            }
            if !doc.categories.contains_item(category, item) {
                return Err(EngineError::ItemNotFound {
                    category: category.to_string(),
                    item: item.to_string(),
                });
            }
        }
        match doc.member_mut(member) {
            Some(m) => {
                let added = m.assign(category, item);
                debug!(member, category, item, added, "item assigned");
                Ok(Change::from_flag(added))
            }
            None => self.missing(EngineError::MemberNotFound(member.to_string())),
        }
    }

    /// Revoking an item the member does not hold is a no-op.
    pub fn revoke_item(
        &self,
        doc: &mut Document,
        member: &str,
        category: &str,
        item: &str,
    ) -> EngineResult<Change> {
        match doc.member_mut(member) {
            Some(m) => {
                let removed = m.revoke(category, item);
                debug!(member, category, item, removed, "item revoked");
                Ok(Change::from_flag(removed))
            }
            None => self.missing(EngineError::MemberNotFound(member.to_string())),
        }
    }

    // ---- Attendance and schedule ----

    /// Overwrites attendance for every member named in `updates`; members
    /// not named follow [`EnginePolicy::absent_attendance`]. All members
    /// sharing a name receive the same slots.
    pub fn update_attendance(
        &self,
        doc: &mut Document,
        updates: &AttendanceUpdate,
    ) -> EngineResult<Change> {
        if self.policy.strict_references {
            if let Some(unknown) = updates.keys().find(|name| !doc.has_member(name)) {
                return Err(EngineError::MemberNotFound(unknown.clone()));
            }
        }
        let mut changed = false;
        for member in &mut doc.members {
            let next = match updates.get(&member.name) {
                Some(input) => Attendance::from_input(input),
                None => match self.policy.absent_attendance {
                    AbsentAttendance::Reset => Attendance::none(),
                    AbsentAttendance::Keep => continue,
                },
            };
            changed |= member.attendance != next;
            member.attendance = next;
        }
        debug!(submitted = updates.len(), changed, "attendance updated");
        Ok(Change::from_flag(changed))
    }

    /// Replaces the event schedule. Blank slots become unscheduled; a value
    /// that is not a `YYYY-MM-DD` date rejects the whole update.
    pub fn update_event_dates<S: AsRef<str>>(
        &self,
        doc: &mut Document,
        raw: &[Option<S>],
    ) -> EngineResult<Change> {
        let dates = EventDates::parse_raw(raw)?;
        let changed = doc.event_dates != dates;
        doc.event_dates = dates;
        debug!(scheduled = dates.scheduled(), "event dates updated");
        Ok(Change::from_flag(changed))
    }
}
