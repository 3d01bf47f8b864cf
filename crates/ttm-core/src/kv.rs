//! Key-value persistence boundary.
//!
//! Route state and the user street layer are stored as JSON strings under
//! namespaced keys. Any backend offering `get`/`set`/`remove` on strings can
//! sit behind [`KeyValueStore`].

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Serialized route (sequence of stops).
pub const STOPS_KEY: &str = "ttm:stops";
/// Route ordering mode.
pub const MODE_KEY: &str = "ttm:mode";
/// Saved route origin.
pub const ORIGIN_KEY: &str = "ttm:origin";
/// User-confirmed streets, city to street names.
pub const USER_STREETS_KEY: &str = "ttm:userStreets";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Process-local store, used in tests and for throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and deserialize the JSON value stored under `key`.
///
/// A value that does not parse as `T` is logged and treated as absent.
///
/// # Errors
///
/// Returns [`StoreError`] only when the backend itself fails.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Serialize `value` to JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the backend write fails.
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn read_json_round_trips_written_value() {
        let mut store = MemoryStore::new();
        let mut value = BTreeMap::new();
        value.insert("Ludes".to_string(), vec!["Rue Pasteur".to_string()]);
        write_json(&mut store, "ttm:userStreets", &value).unwrap();
        let back: Option<BTreeMap<String, Vec<String>>> =
            read_json(&store, "ttm:userStreets").unwrap();
        assert_eq!(back, Some(value));
    }

    #[test]
    fn read_json_treats_malformed_value_as_absent() {
        let mut store = MemoryStore::new();
        store.set("ttm:stops", "{not json").unwrap();
        let value: Option<Vec<String>> = read_json(&store, "ttm:stops").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn read_json_treats_wrong_shape_as_absent() {
        let mut store = MemoryStore::new();
        store.set("ttm:stops", "42").unwrap();
        let value: Option<Vec<String>> = read_json(&store, "ttm:stops").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn mutable_reference_forwards_to_store() {
        fn put<S: KeyValueStore>(mut store: S) {
            store.set("k", "v").unwrap();
        }

        let mut store = MemoryStore::new();
        put(&mut store);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
