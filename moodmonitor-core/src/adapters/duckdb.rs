//! DuckDB key-value store
//!
//! App state lives in a single `sys_kv` table, one JSON document per key.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use duckdb::{params, Connection, OptionalExt};
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result as CoreResult};
use crate::ports::KeyValueStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

fn db_err(e: impl std::fmt::Display) -> Error {
    Error::database(e.to_string())
}

/// Durable state backend on a DuckDB file
pub struct DuckDbKeyValueStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbKeyValueStore {
    /// Open (or create) the database file and bring the schema up to date.
    ///
    /// Opening retries with exponential backoff while another process holds
    /// the file, e.g. a background refresh racing a CLI command.
    pub fn open(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    let store = Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    };
                    store.run_migrations()?;
                    return Ok(store);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[moodmonitor] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// In-memory database, gone when dropped
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory_with_flags(config)?),
            db_path: None,
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Autoloading would pull cached extensions from ~/.duckdb; JSON is statically linked
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        MigrationService::new(&conn).run_pending()
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for DuckDbKeyValueStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn get(&self, key: &str) -> CoreResult<Option<JsonValue>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value::VARCHAR FROM sys_kv WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        raw.map(|text| serde_json::from_str(&text).map_err(Error::from))
            .transpose()
    }

    fn set(&self, key: &str, value: &JsonValue) -> CoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_kv (key, value, updated_at) VALUES (?, ?::JSON, current_timestamp)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value.to_string()],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM sys_kv WHERE key = ?", [key])
            .map_err(db_err)?;
        Ok(deleted > 0)
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key FROM sys_kv ORDER BY key")
            .map_err(db_err)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error(
            "The process cannot access the file because it is being used by another process"
        ));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }

    #[test]
    fn test_set_get_overwrite() {
        let store = DuckDbKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.get("totalMoodsLogged").unwrap(), None);

        store.set("totalMoodsLogged", &json!(3)).unwrap();
        store.set("totalMoodsLogged", &json!(4)).unwrap();

        assert_eq!(store.get("totalMoodsLogged").unwrap(), Some(json!(4)));
        assert_eq!(store.keys().unwrap(), vec!["totalMoodsLogged".to_string()]);
    }

    #[test]
    fn test_nested_documents() {
        let store = DuckDbKeyValueStore::open_in_memory().unwrap();
        let doc = json!({
            "2024-03-01": { "day": "FRI", "moods": [2, 4], "steps": "unknown" }
        });
        store.set("userDataDictionary", &doc).unwrap();
        assert_eq!(store.get("userDataDictionary").unwrap(), Some(doc));
    }

    #[test]
    fn test_remove() {
        let store = DuckDbKeyValueStore::open_in_memory().unwrap();
        store.set("tipsList", &json!(["a"])).unwrap();
        assert!(store.remove("tipsList").unwrap());
        assert!(!store.remove("tipsList").unwrap());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("moodmonitor.duckdb");
        {
            let store = DuckDbKeyValueStore::open(&path).unwrap();
            store.set("hasAlreadyLaunched", &json!(true)).unwrap();
        }

        let store = DuckDbKeyValueStore::open(&path).unwrap();
        assert_eq!(store.get("hasAlreadyLaunched").unwrap(), Some(json!(true)));
        assert!(store.run_migrations().unwrap().applied.is_empty());
        assert_eq!(store.db_path(), Some(path.as_path()));
    }
}
