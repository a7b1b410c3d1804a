//! Interval model -- a single candidate time range on a single calendar day.
//!
//! Dates are truncated to day granularity on the way in, so two inputs that name the
//! same calendar day compare equal no matter what time-of-day or offset noise they
//! carried. Wall-clock times are normalized to minute-of-day, which orders exactly like
//! the zero-padded `HH:mm` form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, ScheduleError};

/// 24-hour `HH:mm`; a one-digit hour is accepted on input.
static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is a valid regex")
});

/// Date-time layouts accepted in addition to plain `YYYY-MM-DD` and RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const MINUTES_PER_HOUR: u16 = 60;
const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// Input did not match the `HH:mm` pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected HH:mm (24-hour), got '{0}'")]
pub struct InvalidTimeOfDay(pub String);

/// A wall-clock time with minute precision, `00:00` through `23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minute_of_day: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minute_of_day: 0 };
    pub const LAST_MINUTE: TimeOfDay = TimeOfDay {
        minute_of_day: MINUTES_PER_DAY - 1,
    };

    /// Build a time from hour and minute, or `None` when either is out of range.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < MINUTES_PER_HOUR {
            Some(TimeOfDay {
                minute_of_day: hour * MINUTES_PER_HOUR + minute,
            })
        } else {
            None
        }
    }

    pub fn hour(self) -> u16 {
        self.minute_of_day / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u16 {
        self.minute_of_day % MINUTES_PER_HOUR
    }

    pub fn minute_of_day(self) -> u16 {
        self.minute_of_day
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(self, later: TimeOfDay) -> i64 {
        i64::from(later.minute_of_day) - i64::from(self.minute_of_day)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let caps = TIME_PATTERN
            .captures(s)
            .ok_or_else(|| InvalidTimeOfDay(s.to_string()))?;
        let hour: u16 = caps[1].parse().map_err(|_| InvalidTimeOfDay(s.to_string()))?;
        let minute: u16 = caps[2].parse().map_err(|_| InvalidTimeOfDay(s.to_string()))?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(|| InvalidTimeOfDay(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InvalidTimeOfDay;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// One event's time span: `[start, end)` on `date`.
///
/// Construction always goes through [`Interval::new`] (or [`normalize`]), so a value of
/// this type has `end > start`. Deserialization re-checks the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    date: NaiveDate,
    #[serde(rename = "start_time")]
    start: TimeOfDay,
    #[serde(rename = "end_time")]
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawInterval {
    date: NaiveDate,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ScheduleError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.date, raw.start_time, raw.end_time)
    }
}

impl Interval {
    /// Build an interval from already-parsed parts.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidRange` when `end <= start`.
    pub fn new(date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if end <= start {
            return Err(ScheduleError::InvalidRange { start, end });
        }
        Ok(Interval { date, start, end })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        self.start.minutes_until(self.end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.date, self.start, self.end)
    }
}

/// Parse a calendar date, discarding any time-of-day or offset component.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times (`2024-06-01T15:30:00+02:00`), and naive
/// ISO date-times (`2024-06-01T15:30:00`). The calendar day is taken as written; an
/// offset is never applied to shift the day.
///
/// # Errors
/// Returns `ScheduleError::MalformedInput` with field `date` when nothing matches.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
        .ok_or_else(|| ScheduleError::malformed("date", format!("invalid date format '{}'", input)))
}

/// Normalize raw admission input into an [`Interval`].
///
/// # Errors
/// - `MalformedInput` (field `date`, `start_time` or `end_time`) for unparseable input.
/// - `InvalidRange` when `end_time <= start_time`.
pub fn normalize(date: &str, start_time: &str, end_time: &str) -> Result<Interval> {
    let date = parse_date(date)?;
    let start = parse_time("start_time", start_time)?;
    let end = parse_time("end_time", end_time)?;
    Interval::new(date, start, end)
}

fn parse_time(field: &'static str, input: &str) -> Result<TimeOfDay> {
    input
        .parse()
        .map_err(|e: InvalidTimeOfDay| ScheduleError::malformed(field, e.to_string()))
}
