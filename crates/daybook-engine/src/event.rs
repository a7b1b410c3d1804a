//! The event entity and the raw input it is admitted from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::interval::{self, Interval, TimeOfDay};
use crate::overlap::Booking;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Opaque event identifier, assigned on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(EventId)
    }
}

/// A committed single-day event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub interval: Interval,
    /// Reference to the authoring user. Never changed after creation.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        self.interval.date()
    }

    pub fn start_time(&self) -> TimeOfDay {
        self.interval.start()
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.interval.end()
    }

    pub fn booking(&self) -> Booking<EventId> {
        Booking::new(self.id, self.interval)
    }
}

/// Unvalidated create/update input, as it arrives from the surrounding layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub title: String,
    pub description: Option<String>,
}

impl EventDraft {
    /// Check title and description bounds, returning the cleaned values.
    ///
    /// The title is trimmed before measuring; a blank description becomes `None`.
    /// Lengths are counted in characters, not bytes.
    pub fn validate_fields(&self) -> Result<ValidatedFields> {
        let title = self.title.trim();
        let title_chars = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_chars) {
            return Err(ScheduleError::malformed(
                "title",
                format!(
                    "must be between {} and {} characters",
                    TITLE_MIN_CHARS, TITLE_MAX_CHARS
                ),
            ));
        }

        let description = match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                if text.chars().count() > DESCRIPTION_MAX_CHARS {
                    return Err(ScheduleError::malformed(
                        "description",
                        format!("must not exceed {} characters", DESCRIPTION_MAX_CHARS),
                    ));
                }
                Some(text.to_string())
            }
            _ => None,
        };

        Ok(ValidatedFields {
            title: title.to_string(),
            description,
        })
    }

    /// Normalize the date and time fields into an [`Interval`].
    pub fn interval(&self) -> Result<Interval> {
        interval::normalize(&self.date, &self.start_time, &self.end_time)
    }
}
