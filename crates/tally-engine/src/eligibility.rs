use tally_types::{Document, Member};

use crate::engine::Engine;
use crate::policy::ItemScope;

/// Members ordered by name (case-sensitive, byte-wise), ties in roster order.
pub fn sorted_members(doc: &Document) -> Vec<Member> {
    let mut members = doc.members.clone();
    members.sort_by(|a, b| a.name.cmp(&b.name));
    members
}

impl Engine {
    /// Whether `member` qualifies for `item` of `category`.
    pub fn is_eligible(&self, member: &Member, category: &str, item: &str) -> bool {
        let policy = self.policy();
        if member.attended() < policy.min_attendance {
            return false;
        }
        match policy.eligibility_scope {
            ItemScope::Category => member.holds(category, item),
            ItemScope::AnyCategory => member.holds_anywhere(item),
        }
    }

    /// Eligible members for `(category, item)`, ordered by name.
    pub fn eligible_members(&self, doc: &Document, category: &str, item: &str) -> Vec<Member> {
        let mut eligible: Vec<Member> = doc
            .members
            .iter()
            .filter(|m| self.is_eligible(m, category, item))
            .cloned()
            .collect();
        // `sort_by` is stable, so equal names keep roster order.
        eligible.sort_by(|a, b| a.name.cmp(&b.name));
        eligible
    }
}
