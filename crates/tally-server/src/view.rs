//! Request bodies and response views for the HTTP surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tally_engine::AttendanceUpdate;
use tally_types::{CategoryRegistry, EventDates, Member, EVENT_SLOTS};

#[derive(Clone, Debug, Deserialize)]
pub struct MemberRequest {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub name: String,
    pub new_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ItemRequest {
    pub category: String,
    pub item: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssignmentRequest {
    pub member: String,
    pub category: String,
    pub item: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttendanceRequest {
    #[serde(default)]
    pub attendance: AttendanceUpdate,
}

/// `event-date-1` .. `event-date-8`, each a `YYYY-MM-DD` string, blank, or
/// null. Missing keys are unscheduled.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct EventDatesRequest(pub BTreeMap<String, Option<String>>);

impl EventDatesRequest {
    /// Raw values in slot order.
    pub fn slots(&self) -> Vec<Option<String>> {
        (1..=EVENT_SLOTS)
            .map(|n| self.0.get(&format!("event-date-{n}")).cloned().flatten())
            .collect()
    }
}

/// Query string of the home view; both fields select an eligibility query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
    pub item: Option<String>,
}

/// Everything the presentation layer renders.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub members: Vec<Member>,
    pub categories: CategoryRegistry,
    pub event_dates: EventDates,
    pub selected_category: String,
    pub selected_item: String,
    pub eligible_members: Vec<Member>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EligibilityResponse {
    pub eligible: Vec<Member>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_dates_request_slots() {
        let req: EventDatesRequest = serde_json::from_value(json!({
            "event-date-1": "2024-01-01",
            "event-date-3": "",
            "event-date-4": null,
            "event-date-8": "2024-02-26",
            "event-date-9": "2024-03-01",
            "other": "x"
        }))
        .unwrap();
        let slots = req.slots();
        assert_eq!(slots.len(), EVENT_SLOTS);
        assert_eq!(slots[0].as_deref(), Some("2024-01-01"));
        assert_eq!(slots[1], None);
        assert_eq!(slots[2].as_deref(), Some(""));
        assert_eq!(slots[3], None);
        assert_eq!(slots[7].as_deref(), Some("2024-02-26"));
    }

    #[test]
    fn attendance_request_shapes() {
        let req: AttendanceRequest = serde_json::from_value(json!({
            "attendance": {
                "Alice": ["on", "on"],
                "Bob": {"2": "true"}
            }
        }))
        .unwrap();
        assert_eq!(req.attendance.len(), 2);

        let empty: AttendanceRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.attendance.is_empty());
    }

    #[test]
    fn rename_request_camel_case() {
        let req: RenameRequest =
            serde_json::from_value(json!({"name": "A", "newName": "B"})).unwrap();
        assert_eq!(req.new_name, "B");
    }

    #[test]
    fn health_default() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert!(!h.version.is_empty());
    }
}
