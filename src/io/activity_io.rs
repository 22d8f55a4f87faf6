use crate::io::kv_store::{KeyValueStore, PersistenceError};
use crate::model::activity::Activity;

/// Read the activity list stored under `key`.
///
/// Falls back to an empty list when the key is absent, the store cannot
/// be read, or the stored value does not decode.
pub fn load_activities<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Vec<Activity> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read activities, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Activity>>(&raw) {
        Ok(activities) => {
            tracing::debug!(key, count = activities.len(), "loaded activities");
            activities
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "stored activities do not parse, starting empty");
            Vec::new()
        }
    }
}

/// Write the full activity list under `key`
pub fn save_activities<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    activities: &[Activity],
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(activities)?;
    store.set(key, raw)
}
