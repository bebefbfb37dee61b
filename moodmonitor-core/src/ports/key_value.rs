//! Durable key-value storage port

use serde_json::Value as JsonValue;

use crate::domain::result::Result;

/// Persisted app state, one JSON value per fixed key
pub trait KeyValueStore: Send + Sync {
    /// Backend name (e.g. "duckdb", "memory")
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    fn set(&self, key: &str, value: &JsonValue) -> Result<()>;

    /// Returns whether the key existed
    fn remove(&self, key: &str) -> Result<bool>;

    fn keys(&self) -> Result<Vec<String>>;
}
