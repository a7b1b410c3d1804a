//! Error types for daybook-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::EventId;
use crate::interval::TimeOfDay;
use crate::store::StoreError;

/// Reasons a candidate event can be refused, plus collaborator failures.
///
/// Every variant except [`ScheduleError::Store`] is an expected branch of the
/// admission protocol and is recoverable by the caller with corrected input.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A field failed its shape, parse, or length constraint.
    #[error("Invalid {field}: {message}")]
    MalformedInput {
        field: &'static str,
        message: String,
    },

    /// The end time is not strictly after the start time.
    #[error("End time must be after start time (got {start}-{end})")]
    InvalidRange { start: TimeOfDay, end: TimeOfDay },

    /// The event date lies before the reference day.
    #[error("Date cannot be in the past ({date} is before {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    /// The candidate overlaps an event already committed on the same day.
    #[error("Time slot already booked by event {conflicting_id}")]
    Conflict { conflicting_id: EventId },

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScheduleError {
    pub(crate) fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        ScheduleError::MalformedInput {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
