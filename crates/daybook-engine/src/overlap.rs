//! Overlap validator -- decide whether a candidate interval may be admitted.
//!
//! Intervals are half-open: an event ending exactly when another starts does NOT
//! conflict with it, so back-to-back scheduling is allowed. Intervals on different
//! calendar days never conflict, even if a caller hands in the wrong day's events.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// An interval already committed to the store, tagged with its owner's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking<Id> {
    pub id: Id,
    pub interval: Interval,
}

impl<Id> Booking<Id> {
    pub fn new(id: Id, interval: Interval) -> Self {
        Self { id, interval }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision<Id> {
    /// The candidate is free to commit.
    Admit,
    /// The candidate collides with the booking `conflicting_id`.
    Reject { conflicting_id: Id },
}

impl<Id> Decision<Id> {
    pub fn is_admit(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

/// A booking that collides with a candidate, and by how much.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<Id> {
    pub booking: Booking<Id>,
    pub overlap_minutes: i64,
}

/// Two intervals overlap iff they share a day and `a.start < b.end && a.end > b.start`.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.date() == b.date() && a.start() < b.end() && a.end() > b.start()
}

/// Decide whether `candidate` may be admitted alongside `existing`.
///
/// `existing` should hold the bookings of the candidate's day. A booking whose id equals
/// `exclude_id` is skipped, which lets an event be moved within its own slot on update.
/// The first colliding booking found is reported; which one that is depends on the
/// order of `existing` and is not otherwise meaningful.
pub fn can_admit<'a, Id, I>(
    candidate: &Interval,
    existing: I,
    exclude_id: Option<&Id>,
) -> Decision<Id>
where
    Id: PartialEq + Clone + 'a,
    I: IntoIterator<Item = &'a Booking<Id>>,
{
    existing
        .into_iter()
        .filter(|booking| exclude_id != Some(&booking.id))
        .find(|booking| overlaps(candidate, &booking.interval))
        .map_or(Decision::Admit, |booking| Decision::Reject {
            conflicting_id: booking.id.clone(),
        })
}

/// Find every booking in `existing` that collides with `candidate`, in scan order.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts<'a, Id, I>(
    candidate: &Interval,
    existing: I,
    exclude_id: Option<&Id>,
) -> Vec<Conflict<Id>>
where
    Id: PartialEq + Clone + 'a,
    I: IntoIterator<Item = &'a Booking<Id>>,
{
    existing
        .into_iter()
        .filter(|booking| exclude_id != Some(&booking.id))
        .filter(|booking| overlaps(candidate, &booking.interval))
        .map(|booking| {
            let overlap_start = candidate.start().max(booking.interval.start());
            let overlap_end = candidate.end().min(booking.interval.end());
            Conflict {
                booking: booking.clone(),
                overlap_minutes: overlap_start.minutes_until(overlap_end),
            }
        })
        .collect()
}
