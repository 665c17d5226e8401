//! SQLite-backed key-value storage.
//!
//! The goal record lives under [`GOAL_STATE_KEY`] in a single `kv` table.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use super::store::GoalStore;
use crate::error::{DatabaseError, PersistenceError};

/// Key of the persisted goal record.
pub const GOAL_STATE_KEY: &str = "learningAppState";

/// SQLite database holding application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/learnstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("learnstreak.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
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

    /// Delete a key. Returns whether a row was removed.
    pub fn kv_delete(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}

impl GoalStore for Database {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        self.kv_get(GOAL_STATE_KEY)
            .map_err(|e| PersistenceError::Read(DatabaseError::from(e).to_string()))
    }

    fn save(&self, blob: &str) -> Result<(), PersistenceError> {
        self.kv_set(GOAL_STATE_KEY, blob)
            .map_err(|e| PersistenceError::Write(DatabaseError::from(e).to_string()))
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.kv_delete(GOAL_STATE_KEY)
            .map(|_| ())
            .map_err(|e| PersistenceError::Delete(DatabaseError::from(e).to_string()))
    }
}
