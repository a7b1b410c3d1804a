use std::collections::BTreeMap;

use chrono::NaiveDate;
use parking_lot::RwLock;

use super::{sort_for_listing, EventStore, StoreResult};
use crate::event::{Event, EventId};

/// In-process store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<BTreeMap<EventId, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventStore for MemoryStore {
    fn find_by_day(&self, day: NaiveDate) -> StoreResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .values()
            .filter(|e| e.date() == day)
            .cloned()
            .collect())
    }

    fn get(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.events.read().get(&id).cloned())
    }

    fn list(&self, day: Option<NaiveDate>) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .values()
            .filter(|e| day.is_none_or(|d| e.date() == d))
            .cloned()
            .collect();
        sort_for_listing(&mut events);
        Ok(events)
    }

    fn insert(&self, event: Event) -> StoreResult<()> {
        self.events.write().insert(event.id, event);
        Ok(())
    }

    fn replace(&self, event: Event) -> StoreResult<bool> {
        let mut events = self.events.write();
        match events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.events.write().remove(&id))
    }
}
