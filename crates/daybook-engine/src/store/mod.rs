//! Event storage collaborator.
//!
//! The scheduler never queries storage in any other way than through [`EventStore`].
//! `find_by_day` must return every event of the requested day; a truncated answer
//! voids the overlap guarantee.

mod file;
mod memory;

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::{Event, EventId};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent set of events, keyed by id.
///
/// Implementations synchronize internally; every method takes `&self`.
pub trait EventStore: Send + Sync {
    /// All events on `day`, in no particular order.
    fn find_by_day(&self, day: NaiveDate) -> StoreResult<Vec<Event>>;

    fn get(&self, id: EventId) -> StoreResult<Option<Event>>;

    /// Events sorted by `(date, start_time)`, optionally restricted to one day.
    fn list(&self, day: Option<NaiveDate>) -> StoreResult<Vec<Event>>;

    fn insert(&self, event: Event) -> StoreResult<()>;

    /// Overwrite the stored event with the same id. Returns `false` if there was none.
    fn replace(&self, event: Event) -> StoreResult<bool>;

    fn remove(&self, id: EventId) -> StoreResult<Option<Event>>;
}

/// Order events the way listings present them.
pub(crate) fn sort_for_listing(events: &mut [Event]) {
    events.sort_by_key(|e| (e.date(), e.start_time(), e.id));
}
