//! SQLite-backed key-value store.
//!
//! Entries live in a single table:
//!
//! ```sql
//! CREATE TABLE kv (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)
//! ```

use std::path::Path;
use std::time::Duration;

use gpa_core::store::{KeyValueStore, StoreError};
use rusqlite::{Connection, OptionalExtension, params};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(|e| {
            StoreError::Io(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::bootstrap(conn)
    }

    /// Ephemeral database, mostly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend_error)?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5)).map_err(backend_error)?;
        conn.execute_batch(SCHEMA).map_err(backend_error)?;
        Ok(Self { conn })
    }
}

fn backend_error(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KeyValueStore for SqliteStore {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(backend_error)
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(backend_error)?;
        Ok(())
    }

    fn remove(
        &mut self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(backend_error)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv", []).map_err(backend_error)?;
        Ok(())
    }
}
