//! SQLite-backed cache store.
//!
//! Entries live in a single `cache_entries` table keyed by cache key. Writes
//! upsert, so the newest payload always replaces the previous one.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use super::CacheStore;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS cache_entries (key TEXT PRIMARY KEY, value TEXT NOT NULL)";
const SELECT_VALUE: &str = "SELECT value FROM cache_entries WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO cache_entries (key, value) VALUES (?1, ?2) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Errors raised by [`SqliteCacheStore`].
#[derive(Debug, Error)]
pub enum SqliteCacheStoreError {
    /// Opening the database file failed.
    #[error("failed to open cache database at {path:?}")]
    Open {
        /// Database path.
        path: PathBuf,
        /// Underlying driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A statement failed.
    #[error("cache database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Cache store persisted in a SQLite database.
///
/// # Examples
/// ```
/// use transit_core::cache::{CacheStore, SqliteCacheStore};
///
/// let store = SqliteCacheStore::open_in_memory()?;
/// store.put("route:B6", "{}")?;
/// assert_eq!(store.get("route:B6")?.as_deref(), Some("{}"));
/// # Ok::<(), transit_core::cache::SqliteCacheStoreError>(())
/// ```
#[derive(Debug)]
pub struct SqliteCacheStore {
    connection: Connection,
}

impl SqliteCacheStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Fails when the file cannot be opened or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteCacheStoreError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| SqliteCacheStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Fails when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteCacheStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteCacheStoreError> {
        connection.execute(CREATE_TABLE, [])?;
        Ok(Self { connection })
    }
}

impl CacheStore for SqliteCacheStore {
    type Error = SqliteCacheStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let value = self
            .connection
            .query_row(SELECT_VALUE, params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.connection.execute(UPSERT_VALUE, params![key, value])?;
        Ok(())
    }
}
