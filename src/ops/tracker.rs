use chrono::{DateTime, TimeZone};

use crate::io::activity_io::{load_activities, save_activities};
use crate::io::kv_store::{KeyValueStore, PersistenceError};
use crate::model::activity::{Activity, ActivityId};
use crate::model::color::ColorSpec;
use crate::ops::store::{ActivityStore, StoreError};

/// A committed mutation. `persist_error` is set when the in-memory change
/// went through but could not be written; the in-memory state stays
/// authoritative for the rest of the session.
#[derive(Debug)]
pub struct Outcome {
    pub id: ActivityId,
    pub lane: u32,
    pub persist_error: Option<PersistenceError>,
}

/// Owns the activity store and writes it back after every mutation
#[derive(Debug)]
pub struct Tracker<S: KeyValueStore> {
    store: ActivityStore,
    persistence: S,
    key: String,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load the activities under `key` (empty when absent or unreadable)
    pub fn open(persistence: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let activities = load_activities(&persistence, &key);
        Tracker {
            store: ActivityStore::from_activities(activities),
            persistence,
            key,
        }
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn activities(&self) -> &[Activity] {
        self.store.activities()
    }

    pub fn persistence(&self) -> &S {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut S {
        &mut self.persistence
    }

    /// Start a new activity. On error nothing is changed or written.
    pub fn add<Tz: TimeZone>(
        &mut self,
        label: &str,
        color: ColorSpec,
        now: &DateTime<Tz>,
    ) -> Result<Outcome, StoreError> {
        let (id, lane) = match self.store.add_activity(label, color, now) {
            Ok(activity) => {
                tracing::info!(id = %activity.id, lane = activity.lane, label = %activity.label, "activity added");
                (activity.id, activity.lane)
            }
            Err(e) => {
                if let StoreError::Allocation(_) = e {
                    tracing::warn!(error = %e, "activity not added");
                }
                return Err(e);
            }
        };
        Ok(Outcome {
            id,
            lane,
            persist_error: self.persist(),
        })
    }

    /// Finish an unfinished activity
    pub fn finish<Tz: TimeZone>(
        &mut self,
        id: ActivityId,
        now: &DateTime<Tz>,
    ) -> Result<Outcome, StoreError> {
        let activity = self.store.finish_activity(id, now)?;
        tracing::info!(id = %activity.id, lane = activity.lane, label = %activity.label, "activity finished");
        let lane = activity.lane;
        Ok(Outcome {
            id,
            lane,
            persist_error: self.persist(),
        })
    }

    fn persist(&mut self) -> Option<PersistenceError> {
        match save_activities(&mut self.persistence, &self.key, self.store.activities()) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not persist activities");
                Some(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv_store::MemoryStore;
    use crate::model::activity::ValidationError;
    use crate::ops::store::AllocationError;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn color() -> ColorSpec {
        ColorSpec::new("hsl(30,50%,90%)")
    }

    #[test]
    fn add_writes_through() {
        let mut tracker = Tracker::open(MemoryStore::new(), "items");
        let outcome = tracker.add("A", color(), &now()).unwrap();
        assert_eq!(outcome.lane, 1);
        assert!(outcome.persist_error.is_none());

        let reloaded = Tracker::open(
            MemoryStore::with_entry("items", tracker.persistence().get("items").unwrap().unwrap()),
            "items",
        );
        assert_eq!(reloaded.activities(), tracker.activities());
    }

    #[test]
    fn rejected_add_writes_nothing() {
        let mut tracker = Tracker::open(MemoryStore::new(), "items");
        let err = tracker.add("", color(), &now()).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyLabel));
        assert_eq!(tracker.persistence().get("items").unwrap(), None);
    }

    #[test]
    fn exhausted_lanes_write_nothing_new() {
        let mut tracker = Tracker::open(MemoryStore::new(), "items");
        for i in 0..10 {
            tracker.add(&format!("a{i}"), color(), &now()).unwrap();
        }
        let before = tracker.persistence().get("items").unwrap();
        let err = tracker.add("overflow", color(), &now()).unwrap_err();
        assert_eq!(
            err,
            StoreError::Allocation(AllocationError::NoSlotsAvailable { max: 10 })
        );
        assert_eq!(tracker.persistence().get("items").unwrap(), before);
        assert_eq!(tracker.activities().len(), 10);
    }

    #[test]
    fn persistence_failure_is_reported_but_mutation_stands() {
        let mut tracker = Tracker::open(MemoryStore::new(), "items");
        tracker.persistence_mut().fail_writes = true;

        let outcome = tracker.add("A", color(), &now()).unwrap();
        assert!(matches!(
            outcome.persist_error,
            Some(PersistenceError::Unavailable(_))
        ));
        assert_eq!(tracker.activities().len(), 1);

        // the next successful write catches the store up
        tracker.persistence_mut().fail_writes = false;
        let later = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let outcome = tracker.finish(outcome.id, &later).unwrap();
        assert!(outcome.persist_error.is_none());
        let raw = tracker.persistence().get("items").unwrap().unwrap();
        assert!(raw.contains("\"label\":\"A\""));
    }

    #[test]
    fn finish_unknown_is_an_error() {
        let mut tracker = Tracker::open(MemoryStore::new(), "items");
        let err = tracker.finish(ActivityId(5), &now()).unwrap_err();
        assert_eq!(err, StoreError::NotFound(ActivityId(5)));
    }
}
