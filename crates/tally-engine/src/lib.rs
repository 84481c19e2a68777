//! Eligibility and mutation engine for Tally.
//!
//! Every operation takes the loaded [`Document`](tally_types::Document),
//! transforms or reads it, and returns. Nothing here holds on to a document
//! between calls.
//!
//! # Modules
//!
//! - [`policy`] — [`EnginePolicy`]: scope, naming, and strictness switches
//! - [`engine`] — [`Engine`] and the mutation operations
//! - [`eligibility`] — who qualifies for an item, and roster ordering
//! - [`roster`] — [`Roster`]: serialized load → transform → save over a store
//! - [`error`] — [`EngineError`]
//!
//! # Eligibility
//!
//! A member is eligible for `(category, item)` when they attended at least
//! [`EnginePolicy::min_attendance`] events (4 of 8 by default) and hold the
//! item. Under the default [`ItemScope::Category`] the item must be assigned
//! under that exact category; [`ItemScope::AnyCategory`] accepts it under any
//! category. Results are ordered by name, ties kept in roster order.

pub mod eligibility;
pub mod engine;
pub mod error;
pub mod policy;
pub mod roster;

pub use eligibility::sorted_members;
pub use engine::{AttendanceUpdate, Change, Engine};
pub use error::{EngineError, EngineResult};
pub use policy::{AbsentAttendance, EnginePolicy, ItemScope, NamePolicy};
pub use roster::Roster;
