//! In-memory key-value store, for tests and throwaway sessions

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, JsonValue>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut BTreeMap<String, JsonValue>) -> T) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.clone());
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_entries(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_entries(|entries| entries.keys().cloned().collect())
    }
}
