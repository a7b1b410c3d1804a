use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{sort_for_listing, EventStore, StoreResult};
use crate::event::{Event, EventId};

/// On-disk layout: `{ "events": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    events: Vec<Event>,
}

/// Store backed by a single pretty-printed JSON file.
///
/// Every call reads the file; every mutation rewrites it through a sibling temp file
/// and a rename, so readers never observe a half-written document. A missing file is
/// an empty store. Access is serialized within the process only.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<StoreDocument> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, document: &StoreDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("daybook"));
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            events = document.events.len(),
            "store file written"
        );
        Ok(())
    }

    /// Load, apply `f`, and write back if `f` reports a change.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Event>) -> (T, bool)) -> StoreResult<T> {
        let _guard = self.io_lock.lock();
        let mut document = self.load()?;
        let (result, changed) = f(&mut document.events);
        if changed {
            self.save(&document)?;
        }
        Ok(result)
    }
}

impl EventStore for JsonFileStore {
    fn find_by_day(&self, day: NaiveDate) -> StoreResult<Vec<Event>> {
        let _guard = self.io_lock.lock();
        let document = self.load()?;
        Ok(document
            .events
            .into_iter()
            .filter(|e| e.date() == day)
            .collect())
    }

    fn get(&self, id: EventId) -> StoreResult<Option<Event>> {
        let _guard = self.io_lock.lock();
        let document = self.load()?;
        Ok(document.events.into_iter().find(|e| e.id == id))
    }

    fn list(&self, day: Option<NaiveDate>) -> StoreResult<Vec<Event>> {
        let _guard = self.io_lock.lock();
        let document = self.load()?;
        let mut events: Vec<Event> = document
            .events
            .into_iter()
            .filter(|e| day.is_none_or(|d| e.date() == d))
            .collect();
        sort_for_listing(&mut events);
        Ok(events)
    }

    fn insert(&self, event: Event) -> StoreResult<()> {
        self.modify(|events| {
            events.retain(|e| e.id != event.id);
            events.push(event);
            ((), true)
        })
    }

    fn replace(&self, event: Event) -> StoreResult<bool> {
        self.modify(|events| match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                (true, true)
            }
            None => (false, false),
        })
    }

    fn remove(&self, id: EventId) -> StoreResult<Option<Event>> {
        self.modify(|events| match events.iter().position(|e| e.id == id) {
            Some(index) => (Some(events.remove(index)), true),
            None => (None, false),
        })
    }
}
