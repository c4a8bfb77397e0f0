//! SQLite-backed key-value store.
//!
//! Holds the persisted quit session under the keys written by
//! [`persist`](super::persist). The schema is a single `kv` table plus a
//! `schema_version` row so later migrations can be applied in order.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KvStore};
use crate::error::StoreError;

/// Current schema version.
const SCHEMA_VERSION: i32 = 1;

pub const DEFAULT_DB_FILE: &str = "smokefree.db";

/// SQLite database used as the tracker's key-value store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `<data_dir>/<file_name>`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open_in_data_dir(file_name: &str) -> Result<Self, StoreError> {
        let path = data_dir()?.join(file_name);
        Self::open(&path)
    }

    /// Open the database at `path`, creating file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn schema_version(&self) -> i32 {
        self.conn
            .query_row("SELECT version FROM schema_version", [], |row| {
                row.get::<_, i32>(0)
            })
            .unwrap_or_else(|e| {
                if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    tracing::warn!("failed to read schema_version: {}", e);
                }
                0
            })
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );",
        )?;

        let current = self.schema_version();
        if current < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )?;
        }

        if current < SCHEMA_VERSION {
            self.conn.execute("DELETE FROM schema_version", [])?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
            tracing::debug!("migrated schema from v{} to v{}", current, SCHEMA_VERSION);
        }
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.kv_get(key)?)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.kv_set(key, value)?)
    }
}
