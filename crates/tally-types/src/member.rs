use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attendance::Attendance;

/// Namespace for identifiers derived from records stored without one.
const LEGACY_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x7a1e_5c0d_91b4_4f2e_8d63_0c4b_2f9a_e571);

/// Stable member identifier.
///
/// Decoupled from the display name so that renames never merge or split
/// member records. New members get a time-ordered UUID v7; records stored
/// before identifiers existed get a UUID v5 derived from their position and
/// name, so every load of the same file yields the same IDs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(uuid::Uuid);

impl MemberId {
    /// Generate a new time-ordered member ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Deterministic ID for the record at `position` in a stored roster.
    pub fn legacy(position: usize, name: &str) -> Self {
        let key = format!("{position}:{name}");
        Self(uuid::Uuid::new_v5(&LEGACY_NAMESPACE, key.as_bytes()))
    }

    /// Placeholder for a record read without an ID; see [`MemberId::legacy`].
    pub fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.short_id())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked individual.
///
/// `items` maps a category name to the set of item names assigned to this
/// member under that category. Set semantics keep repeated assignments from
/// accumulating duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Nil when read from a record that predates identifiers; loading a
    /// [`Document`](crate::Document) replaces it with [`MemberId::legacy`].
    #[serde(default = "MemberId::nil")]
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub attendance: Attendance,
    #[serde(default)]
    pub items: BTreeMap<String, BTreeSet<String>>,
}

impl Member {
    /// A new member with no attendance and no items.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            attendance: Attendance::none(),
            items: BTreeMap::new(),
        }
    }

    /// Number of events attended.
    pub fn attended(&self) -> usize {
        self.attendance.count()
    }

    /// Whether `item` is assigned under `category`.
    pub fn holds(&self, category: &str, item: &str) -> bool {
        self.items
            .get(category)
            .is_some_and(|set| set.contains(item))
    }

    /// Whether `item` is assigned under any category.
    pub fn holds_anywhere(&self, item: &str) -> bool {
        self.items.values().any(|set| set.contains(item))
    }

    /// Assign `item` under `category`, creating the category entry if needed.
    /// Returns `false` if it was already assigned.
    pub fn assign(&mut self, category: &str, item: &str) -> bool {
        self.items
            .entry(category.to_string())
            .or_default()
            .insert(item.to_string())
    }

    /// Remove `item` from `category`. Returns `true` if it was assigned.
    pub fn revoke(&mut self, category: &str, item: &str) -> bool {
        self.items
            .get_mut(category)
            .is_some_and(|set| set.remove(item))
    }

    /// Remove `item` from every category it is assigned under. Returns the
    /// number of categories it was removed from.
    pub fn revoke_everywhere(&mut self, item: &str) -> usize {
        self.items
            .values_mut()
            .map(|set| set.remove(item))
            .filter(|removed| *removed)
            .count()
    }

    /// Drop the whole `category` entry. Returns `true` if it existed.
    pub fn drop_category(&mut self, category: &str) -> bool {
        self.items.remove(category).is_some()
    }

}
