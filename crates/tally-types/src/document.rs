use serde::{Deserialize, Serialize};

use crate::catalog::CategoryRegistry;
use crate::member::{Member, MemberId};
use crate::schedule::EventDates;

/// The whole application state, loaded and saved as one unit.
///
/// Every field defaults when absent, so an older
/// `{"members": [], "categories": {}}` file loads as-is. Members stored
/// without an `id` are given [`MemberId::legacy`] identifiers on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredDocument")]
pub struct Document {
    pub members: Vec<Member>,
    pub categories: CategoryRegistry,
    pub event_dates: EventDates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    categories: CategoryRegistry,
    #[serde(default)]
    event_dates: EventDates,
}

impl From<StoredDocument> for Document {
    fn from(stored: StoredDocument) -> Self {
        let mut members = stored.members;
        for (position, member) in members.iter_mut().enumerate() {
            if member.id.is_nil() {
                member.id = MemberId::legacy(position, &member.name);
            }
        }
        Self {
            members,
            categories: stored.categories,
            event_dates: stored.event_dates,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// First member with exactly this name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.name == name)
    }

    pub fn member_by_id(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}
