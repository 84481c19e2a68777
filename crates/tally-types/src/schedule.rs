use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::attendance::EVENT_SLOTS;
use crate::error::{TypeError, TypeResult};

/// Date format used on the wire and accepted from clients (`2024-03-17`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date for each event slot, positionally aligned with every
/// member's [`Attendance`](crate::Attendance).
///
/// `None` marks a slot that has not been scheduled yet. Dates are not
/// required to be chronological.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventDates([Option<NaiveDate>; EVENT_SLOTS]);

impl EventDates {
    /// Parse one raw slot value.
    ///
    /// Empty input and the literal `unscheduled` map to `None`; anything else
    /// must be a `YYYY-MM-DD` date.
    pub fn parse_slot(slot: usize, raw: &str) -> TypeResult<Option<NaiveDate>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unscheduled") {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Some)
            .map_err(|_| TypeError::InvalidDate {
                slot,
                value: raw.to_string(),
            })
    }

    /// Build from raw client values. Missing trailing slots are unscheduled;
    /// values past [`EVENT_SLOTS`] are ignored.
    pub fn parse_raw<S: AsRef<str>>(raw: &[Option<S>]) -> TypeResult<Self> {
        let mut out = [None; EVENT_SLOTS];
        for (slot, (dst, value)) in out.iter_mut().zip(raw).enumerate() {
            if let Some(value) = value {
                *dst = Self::parse_slot(slot, value.as_ref())?;
            }
        }
        Ok(Self(out))
    }

    /// Number of slots with a date.
    pub fn scheduled(&self) -> usize {
        self.0.iter().filter(|d| d.is_some()).count()
    }

    pub fn slots(&self) -> &[Option<NaiveDate>; EVENT_SLOTS] {
        &self.0
    }
}

impl Serialize for EventDates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EventDates {
    /// Stored documents are read leniently: an entry that does not parse as a
    /// date is treated as unscheduled rather than failing the whole load.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
        let mut out = [None; EVENT_SLOTS];
        for (slot, (dst, value)) in out.iter_mut().zip(&raw).enumerate() {
            *dst = value
                .as_deref()
                .and_then(|v| Self::parse_slot(slot, v).ok().flatten());
        }
        Ok(Self(out))
    }
}
