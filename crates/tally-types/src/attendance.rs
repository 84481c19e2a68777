use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::checkbox;

/// Number of tracked event slots. Every attendance record and the event
/// schedule have exactly this many positions.
pub const EVENT_SLOTS: usize = 8;

/// Per-member attendance: one flag per event slot.
///
/// The fixed-size array makes the length invariant structural. On the wire it
/// is a JSON array of booleans; reading pads short arrays with `false`,
/// truncates long ones, and coerces each entry through
/// [`checkbox::is_checked`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attendance([bool; EVENT_SLOTS]);

impl Attendance {
    /// All slots unattended.
    pub const fn none() -> Self {
        Self([false; EVENT_SLOTS])
    }

    /// Normalize a raw client payload for one member.
    pub fn from_input(input: &AttendanceInput) -> Self {
        let mut out = [false; EVENT_SLOTS];
        match input {
            AttendanceInput::Slots(values) => {
                for (dst, v) in out.iter_mut().zip(values) {
                    *dst = checkbox::is_checked(v);
                }
            }
            AttendanceInput::Indexed(map) => {
                for (key, v) in map {
                    if let Ok(idx) = key.trim().parse::<usize>() {
                        if idx < EVENT_SLOTS {
                            out[idx] = checkbox::is_checked(v);
                        }
                    }
                }
            }
            AttendanceInput::Single(v) => out[0] = checkbox::is_checked(v),
        }
        Self(out)
    }

    /// Number of attended events.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|a| **a).count()
    }

    pub fn slots(&self) -> &[bool; EVENT_SLOTS] {
        &self.0
    }
}

impl fmt::Debug for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks: String = self.0.iter().map(|a| if *a { 'x' } else { '.' }).collect();
        write!(f, "Attendance[{marks}]")
    }
}

impl Serialize for Attendance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Attendance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::from_input(&AttendanceInput::Slots(raw)))
    }
}

/// Raw attendance slots for one member as submitted by a client.
///
/// JSON clients send an array; form encoders that keep explicit indices
/// produce an object keyed by slot number; a lone checkbox may arrive as a
/// scalar, which lands in slot 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttendanceInput {
    Slots(Vec<Value>),
    Indexed(BTreeMap<String, Value>),
    Single(Value),
}

impl From<Vec<bool>> for AttendanceInput {
    fn from(slots: Vec<bool>) -> Self {
        Self::Slots(slots.into_iter().map(Value::Bool).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn none_has_no_attendance() {
        assert_eq!(Attendance::none().count(), 0);
        assert_eq!(Attendance::default(), Attendance::none());
    }

    fn from_bools(slots: &[bool]) -> Attendance {
        Attendance::from_input(&slots.to_vec().into())
    }

    #[test]
    fn pads_and_truncates() {
        let short = from_bools(&[true, true]);
        assert_eq!(short.count(), 2);
        assert!(!short.slots()[7]);

        let long = from_bools(&[true; 12]);
        assert_eq!(long.count(), EVENT_SLOTS);
    }

    #[test]
    fn input_slots_use_checkbox_semantics() {
        let input: AttendanceInput =
            serde_json::from_value(json!(["on", "true", true, "false", 1, null])).unwrap();
        let a = Attendance::from_input(&input);
        assert_eq!(a.slots(), &[true, true, true, false, false, false, false, false]);
    }

    #[test]
    fn input_indexed_object() {
        let input: AttendanceInput =
            serde_json::from_value(json!({"0": "on", "5": "on", "9": "on", "x": "on"})).unwrap();
        assert!(matches!(input, AttendanceInput::Indexed(_)));
        let a = Attendance::from_input(&input);
        assert_eq!(a.count(), 2);
        assert!(a.slots()[5]);
    }

    #[test]
    fn input_single_scalar() {
        let input: AttendanceInput = serde_json::from_value(json!("on")).unwrap();
        let a = Attendance::from_input(&input);
        assert!(a.slots()[0]);
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn deserialize_short_and_null() {
        let a: Attendance = serde_json::from_value(json!([true, true, true])).unwrap();
        assert_eq!(a.count(), 3);
        let b: Attendance = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(b, Attendance::none());
    }

    #[test]
    fn serializes_as_bool_array() {
        let a = from_bools(&[true, false, true]);
        assert_eq!(
            serde_json::to_value(a).unwrap(),
            json!([true, false, true, false, false, false, false, false])
        );
    }

    #[test]
    fn debug_marks() {
        let a = from_bools(&[true, false, true]);
        assert_eq!(format!("{a:?}"), "Attendance[x.x.....]");
    }

    fn arb_slot() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            Just(Value::String("on".into())),
            Just(Value::String("true".into())),
            ".{0,6}".prop_map(Value::String),
            any::<i64>().prop_map(|n| json!(n)),
            Just(Value::Null),
        ]
    }

    proptest! {
        #[test]
        fn any_payload_yields_eight_slots(values in proptest::collection::vec(arb_slot(), 0..20)) {
            let expected = values
                .iter()
                .take(EVENT_SLOTS)
                .filter(|v| checkbox::is_checked(v))
                .count();
            let a = Attendance::from_input(&AttendanceInput::Slots(values));
            prop_assert_eq!(a.slots().len(), EVENT_SLOTS);
            prop_assert_eq!(a.count(), expected);
            let json = serde_json::to_value(a).unwrap();
            prop_assert_eq!(json.as_array().map(Vec::len), Some(EVENT_SLOTS));
        }
    }
}
