//! Checkbox-style truth coercion for attendance payloads.
//!
//! HTML forms submit a checked box as `"on"`, JSON clients send `true`, and
//! some clients stringify booleans. The complete truth table:
//!
//! | value           | checked |
//! |-----------------|---------|
//! | `true`          | yes     |
//! | `"true"`        | yes     |
//! | `"on"`          | yes     |
//! | anything else   | no      |
//!
//! "Anything else" includes `false`, `"false"`, `"1"`, `1`, `null`, arrays,
//! objects, and a missing value. Matching is exact and case-sensitive.

use serde_json::Value;

/// Returns `true` if `value` counts as a checked box.
pub fn is_checked(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "on",
        _ => false,
    }
}
