//! # daybook-engine
//!
//! Admission rules for single-day, timed events.
//!
//! Two events on the same calendar date must never have overlapping time ranges. This
//! crate owns that invariant: it normalizes candidate intervals, decides admit/reject
//! against the events already committed for the day, and runs the full
//! validate-check-persist protocol over a pluggable store.
//!
//! ## Modules
//!
//! - [`interval`] — date + `HH:mm` pair → validated [`Interval`]
//! - [`overlap`] — half-open overlap predicate and the admit/reject decision
//! - [`freebusy`] — free gaps between the booked intervals of a day
//! - [`event`] — the `Event` entity and its unvalidated `EventDraft` input
//! - [`store`] — `EventStore` collaborator trait, in-memory and JSON-file stores
//! - [`scheduler`] — per-day serialized admission protocol
//! - [`error`] — Error types

pub mod error;
pub mod event;
pub mod freebusy;
pub mod interval;
pub mod overlap;
pub mod scheduler;
pub mod store;

pub use error::ScheduleError;
pub use event::{Event, EventDraft, EventId};
pub use freebusy::{find_first_free_slot, find_free_slots, FreeSlot};
pub use interval::{normalize, parse_date, Interval, TimeOfDay};
pub use overlap::{can_admit, find_conflicts, overlaps, Booking, Conflict, Decision};
pub use scheduler::{DayLocks, Scheduler};
pub use store::{EventStore, JsonFileStore, MemoryStore, StoreError};
