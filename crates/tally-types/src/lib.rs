//! Foundation types for Tally.
//!
//! This crate provides the data model shared by every other Tally crate: the
//! member roster, the per-member attendance record, the item catalog grouped
//! by category, and the schedule of tracked events.
//!
//! # Key Types
//!
//! - [`Document`] — Root aggregate persisted as a single JSON document
//! - [`Member`] — A tracked individual with attendance and assigned items
//! - [`MemberId`] — Stable UUID v7 identifier decoupled from the display name
//! - [`Attendance`] — Exactly [`EVENT_SLOTS`] booleans, one per event slot
//! - [`CategoryRegistry`] — Category name to ordered, duplicate-free item list
//! - [`EventDates`] — Optional calendar date per event slot
//!
//! The loose checkbox coercion used by attendance payloads lives in
//! [`checkbox`] as a single documented truth table.

pub mod attendance;
pub mod catalog;
pub mod checkbox;
pub mod document;
pub mod error;
pub mod member;
pub mod schedule;

pub use attendance::{Attendance, AttendanceInput, EVENT_SLOTS};
pub use catalog::CategoryRegistry;
pub use document::Document;
pub use error::{TypeError, TypeResult};
pub use member::{Member, MemberId};
pub use schedule::EventDates;
