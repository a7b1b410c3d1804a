//! Admission protocol -- validate, normalize, check overlap, persist.
//!
//! Admission is serializable per calendar day: "fetch the day's events, decide, persist"
//! runs while holding that day's lock, so two writers targeting the same day cannot
//! both be admitted against the same stale snapshot. Writers on different days do not
//! contend, and reads never take a day lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::event::{Event, EventDraft, EventId};
use crate::freebusy::{self, FreeSlot};
use crate::interval::{Interval, TimeOfDay};
use crate::overlap::{self, Booking, Conflict, Decision};
use crate::store::EventStore;

/// Registry of one mutex per calendar day.
#[derive(Debug, Default)]
pub struct DayLocks {
    // TODO: drop entries whose lock is idle once the map grows past a few hundred days.
    days: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl DayLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `day`.
    pub fn with_day<T>(&self, day: NaiveDate, f: impl FnOnce() -> T) -> T {
        let day_lock = Arc::clone(self.days.lock().entry(day).or_default());
        let _guard = day_lock.lock();
        f()
    }
}

/// Create/update/delete entry point over an [`EventStore`].
pub struct Scheduler<S> {
    store: S,
    day_locks: DayLocks,
}

impl<S: EventStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            day_locks: DayLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Admit a new event authored by `created_by`.
    ///
    /// # Errors
    /// `MalformedInput`, `InvalidRange`, `PastDate` (date before `today`), `Conflict`,
    /// or `Store`.
    pub fn create(&self, draft: &EventDraft, created_by: &str, today: NaiveDate) -> Result<Event> {
        let fields = draft.validate_fields()?;
        let interval = draft.interval()?;
        ensure_not_past(interval.date(), today)?;

        self.day_locks.with_day(interval.date(), || {
            self.admit(&interval, None)?;

            let now = Utc::now();
            let event = Event {
                id: EventId::new(),
                title: fields.title,
                description: fields.description,
                interval,
                created_by: created_by.to_string(),
                created_at: now,
                updated_at: now,
            };
            self.store.insert(event.clone())?;

            info!(event_id = %event.id, interval = %interval, "event created");
            Ok(event)
        })
    }

    /// Re-admit event `id` with new values, checked against its siblings only.
    ///
    /// The event may move to another day. `id`, `created_by` and `created_at` are kept.
    ///
    /// # Errors
    /// As [`Scheduler::create`], plus `NotFound` when `id` is not stored.
    pub fn update(&self, id: EventId, draft: &EventDraft, today: NaiveDate) -> Result<Event> {
        let fields = draft.validate_fields()?;
        let interval = draft.interval()?;
        ensure_not_past(interval.date(), today)?;

        self.day_locks.with_day(interval.date(), || {
            let current = self.store.get(id)?.ok_or(ScheduleError::NotFound(id))?;
            self.admit(&interval, Some(id))?;

            let updated = Event {
                title: fields.title,
                description: fields.description,
                interval,
                updated_at: Utc::now(),
                ..current
            };
            if !self.store.replace(updated.clone())? {
                return Err(ScheduleError::NotFound(id));
            }

            info!(event_id = %id, interval = %interval, "event updated");
            Ok(updated)
        })
    }

    /// Remove event `id`. Removing an event cannot create an overlap, so no check runs.
    pub fn delete(&self, id: EventId) -> Result<Event> {
        let removed = self.store.remove(id)?.ok_or(ScheduleError::NotFound(id))?;
        info!(event_id = %id, "event deleted");
        Ok(removed)
    }

    pub fn get(&self, id: EventId) -> Result<Event> {
        self.store.get(id)?.ok_or(ScheduleError::NotFound(id))
    }

    /// Events sorted by date then start time, optionally for one day.
    pub fn list(&self, day: Option<NaiveDate>) -> Result<Vec<Event>> {
        Ok(self.store.list(day)?)
    }

    /// Dry-run admission of `interval` against the stored events of its day.
    pub fn check(
        &self,
        interval: &Interval,
        exclude_id: Option<EventId>,
    ) -> Result<Decision<EventId>> {
        let bookings = self.bookings_on(interval.date())?;
        Ok(overlap::can_admit(interval, &bookings, exclude_id.as_ref()))
    }

    /// Every stored event colliding with `interval`, with overlap lengths.
    pub fn conflicts(
        &self,
        interval: &Interval,
        exclude_id: Option<EventId>,
    ) -> Result<Vec<Conflict<EventId>>> {
        let bookings = self.bookings_on(interval.date())?;
        Ok(overlap::find_conflicts(interval, &bookings, exclude_id.as_ref()))
    }

    /// Free gaps on `day` within `[window_start, window_end)`.
    pub fn free_slots(
        &self,
        day: NaiveDate,
        window_start: TimeOfDay,
        window_end: TimeOfDay,
    ) -> Result<Vec<FreeSlot>> {
        let booked: Vec<Interval> = self
            .store
            .find_by_day(day)?
            .iter()
            .map(|e| e.interval)
            .collect();
        Ok(freebusy::find_free_slots(&booked, window_start, window_end))
    }

    fn bookings_on(&self, day: NaiveDate) -> Result<Vec<Booking<EventId>>> {
        Ok(self
            .store
            .find_by_day(day)?
            .iter()
            .map(Event::booking)
            .collect())
    }

    /// Caller must hold the day lock for `interval.date()`.
    fn admit(&self, interval: &Interval, exclude_id: Option<EventId>) -> Result<()> {
        let bookings = self.bookings_on(interval.date())?;
        debug!(
            interval = %interval,
            same_day = bookings.len(),
            "checking admission"
        );

        match overlap::can_admit(interval, &bookings, exclude_id.as_ref()) {
            Decision::Admit => Ok(()),
            Decision::Reject { conflicting_id } => {
                warn!(interval = %interval, conflicting_id = %conflicting_id, "admission rejected");
                Err(ScheduleError::Conflict { conflicting_id })
            }
        }
    }
}

fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < today {
        return Err(ScheduleError::PastDate { date, today });
    }
    Ok(())
}
