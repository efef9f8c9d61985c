use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::Storage;
use crate::error::DiagStoreError;

/// Appends `entry` to the JSON array under `key`, evicting from the front
/// until at most `capacity` entries remain, then writes the array back.
///
/// A corrupt existing array is replaced by a fresh one holding only the new
/// entry; recording must not fail because an old buffer rotted.
pub fn push_bounded<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    entry: &T,
    capacity: usize,
) -> Result<(), DiagStoreError> {
    let mut entries: Vec<serde_json::Value> = match storage.load(key)? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        None => Vec::new(),
    };

    let value =
        serde_json::to_value(entry).map_err(|source| DiagStoreError::json_serialize(key, source))?;
    entries.push(value);

    if entries.len() > capacity {
        let excess = entries.len() - capacity;
        entries.drain(..excess);
    }

    let raw = serde_json::to_string(&entries)
        .map_err(|source| DiagStoreError::json_serialize(key, source))?;
    storage.store(key, &raw)
}

/// Reads the full JSON array under `key`, oldest entry first. An absent key
/// reads as empty.
pub fn read_all<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Vec<T>, DiagStoreError> {
    match storage.load(key)? {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|source| DiagStoreError::json_parse(key, source))
        }
        None => Ok(Vec::new()),
    }
}
