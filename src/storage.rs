//! Storage layer for MasterList: a single-table SQLite key-value store.

use crate::codec;
use crate::types::{Category, Payload};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Key holding the serialized store snapshot.
pub const PAYLOAD_KEY: &str = "MasterListDB_payload_v1";

/// Key holding the monotonic export counter.
pub const EXPORT_COUNTER_KEY: &str = "MasterListDB_export_counter_v1";

/// Key holding the RFC 3339 time of the last export.
pub const LAST_EXPORT_AT_KEY: &str = "MasterListDB_last_export_at_v1";

/// Key holding "1" when the store changed since the last export.
pub const DIRTY_SINCE_EXPORT_KEY: &str = "MasterListDB_dirty_since_export_v1";

/// Durable key-value storage.
pub trait Persistence {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Atomically add one to an integer value (missing counts as 0) and return it.
    fn increment(&mut self, key: &str) -> Result<u64>;

    /// Whether writes survive the process.
    fn is_durable(&self) -> bool;

    /// Replace the stored snapshot with this payload.
    fn save_payload(&mut self, payload: &Payload) -> Result<()> {
        self.put(PAYLOAD_KEY, &codec::render_compact(payload))
            .context("Failed to save snapshot")
    }

    /// Load the most recent snapshot.
    ///
    /// Returns `Ok(None)` if there is none or it cannot be understood; a
    /// corrupt snapshot is logged and treated as absent.
    fn load_categories(&self) -> Result<Option<Vec<Category>>> {
        let text = match self.get(PAYLOAD_KEY).context("Failed to read snapshot")? {
            Some(text) => text,
            None => return Ok(None),
        };

        match codec::parse_snapshot(&text) {
            Ok(categories) => Ok(Some(categories)),
            Err(e) => {
                log::warn!("Ignoring unreadable snapshot: {:?}", e);
                Ok(None)
            }
        }
    }
}

/// SQLite-backed storage.
pub struct SqliteStorage {
    db: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let db = Connection::open(path).context("Failed to open SQLite database")?;
        let storage = Self { db };
        storage.init_schema()?;

        Ok(storage)
    }

    /// Initialize SQLite schema.
    fn init_schema(&self) -> Result<()> {
        self.db
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
            "#,
            )
            .context("Failed to initialize schema")?;

        Ok(())
    }
}

impl Persistence for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.db.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        let value: String = self.db.query_row(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, '1')
            ON CONFLICT(key) DO UPDATE SET value = CAST(CAST(value AS INTEGER) + 1 AS TEXT)
            RETURNING value
            "#,
            params![key],
            |row| row.get(0),
        )?;

        value
            .parse()
            .with_context(|| format!("Counter {} is not an integer: {}", key, value))
    }

    fn is_durable(&self) -> bool {
        true
    }
}

/// Process-local storage, used when no database is available.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        let current: u64 = match self.values.get(key) {
            Some(v) => v.parse().with_context(|| format!("Counter {} is not an integer: {}", key, v))?,
            None => 0,
        };
        let next = current + 1;
        self.values.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    fn is_durable(&self) -> bool {
        false
    }
}
