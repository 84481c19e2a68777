use serde::{Deserialize, Serialize};

/// Where an item assignment is looked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemScope {
    /// Only under the named category.
    #[default]
    Category,
    /// Under any category the member has assignments in.
    AnyCategory,
}

/// Whether member names must be unique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Adding an existing name is refused (no-op, or an error when strict).
    #[default]
    Unique,
    /// Duplicate names are stored as separate members.
    AllowDuplicates,
}

/// What an attendance update does to members missing from the payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentAttendance {
    /// Clear their attendance. A form only submits checked boxes, so a member
    /// with every box unchecked is absent from the payload.
    #[default]
    Reset,
    /// Leave their attendance untouched.
    Keep,
}

/// Behavior switches for the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    /// Where eligibility looks for the requested item.
    pub eligibility_scope: ItemScope,
    /// Which member assignments `remove_item` cascades to.
    pub removal_scope: ItemScope,
    pub member_names: NamePolicy,
    pub absent_attendance: AbsentAttendance,
    /// Report missing members, categories, and items as errors instead of
    /// ignoring the operation.
    pub strict_references: bool,
    /// Attended events needed to be eligible.
    pub min_attendance: usize,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            eligibility_scope: ItemScope::Category,
            removal_scope: ItemScope::Category,
            member_names: NamePolicy::Unique,
            absent_attendance: AbsentAttendance::Reset,
            strict_references: false,
            min_attendance: 4,
        }
    }
}

impl EnginePolicy {
    /// Default policy with missing references reported as errors.
    pub fn strict() -> Self {
        Self {
            strict_references: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = EnginePolicy::default();
        assert_eq!(p.eligibility_scope, ItemScope::Category);
        assert_eq!(p.removal_scope, ItemScope::Category);
        assert_eq!(p.member_names, NamePolicy::Unique);
        assert_eq!(p.absent_attendance, AbsentAttendance::Reset);
        assert!(!p.strict_references);
        assert_eq!(p.min_attendance, 4);
    }

    #[test]
    fn strict_only_flips_references() {
        let p = EnginePolicy::strict();
        assert!(p.strict_references);
        assert_eq!(p.min_attendance, 4);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let p: EnginePolicy = toml::from_str(
            r#"
            eligibility_scope = "any_category"
            absent_attendance = "keep"
            "#,
        )
        .unwrap();
        assert_eq!(p.eligibility_scope, ItemScope::AnyCategory);
        assert_eq!(p.absent_attendance, AbsentAttendance::Keep);
        assert_eq!(p.removal_scope, ItemScope::Category);
        assert_eq!(p.min_attendance, 4);
    }
}
