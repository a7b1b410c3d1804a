//! Compute free time slots within one day.
//!
//! Sorts the booked intervals by start time, merges overlapping or touching busy
//! periods, then computes the gaps between merged periods inside a wall-clock window.

use serde::Serialize;

use crate::interval::{Interval, TimeOfDay};

/// A free time slot on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn between(start: TimeOfDay, end: TimeOfDay) -> Self {
        FreeSlot {
            start,
            end,
            duration_minutes: start.minutes_until(end),
        }
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of (start, end) pairs.
fn merge_busy_periods(
    booked: &[Interval],
    window_start: TimeOfDay,
    window_end: TimeOfDay,
) -> Vec<(TimeOfDay, TimeOfDay)> {
    let mut periods: Vec<(TimeOfDay, TimeOfDay)> = booked
        .iter()
        .filter(|i| i.start() < window_end && i.end() > window_start)
        .map(|i| (i.start().max(window_start), i.end().min(window_end)))
        .collect();

    periods.sort_unstable();

    let mut merged: Vec<(TimeOfDay, TimeOfDay)> = Vec::with_capacity(periods.len());
    for (start, end) in periods {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Find free slots within `[window_start, window_end)` given the booked intervals of a day.
///
/// Callers pass intervals of one calendar day; the date component is not inspected.
/// An empty or inverted window has no free slots.
pub fn find_free_slots(
    booked: &[Interval],
    window_start: TimeOfDay,
    window_end: TimeOfDay,
) -> Vec<FreeSlot> {
    if window_start >= window_end {
        return Vec::new();
    }

    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in merge_busy_periods(booked, window_start, window_end) {
        if cursor < busy_start {
            free_slots.push(FreeSlot::between(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        free_slots.push(FreeSlot::between(cursor, window_end));
    }

    free_slots
}

/// Find the first free slot of at least `min_duration_minutes` within the window.
pub fn find_first_free_slot(
    booked: &[Interval],
    window_start: TimeOfDay,
    window_end: TimeOfDay,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_free_slots(booked, window_start, window_end)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}
