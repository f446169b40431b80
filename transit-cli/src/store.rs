//! Cache backend selection for `locate`.

use camino::Utf8Path;
use log::debug;
use transit_core::CacheStore;
use transit_core::cache::{MemoryCacheStore, SqliteCacheStore, SqliteCacheStoreError};

use crate::CliError;

/// Either a process-local or a persistent cache store.
#[derive(Debug)]
pub(crate) enum CliCacheStore {
    Memory(MemoryCacheStore),
    Sqlite(SqliteCacheStore),
}

impl CliCacheStore {
    /// Open the SQLite cache at `path`, or an in-memory store when unset.
    ///
    /// The database's parent directory is created when missing.
    pub(crate) fn open(path: Option<&Utf8Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            debug!("using in-memory trip cache");
            return Ok(Self::Memory(MemoryCacheStore::new()));
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CliError::CreateCacheDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug!("using trip cache at {path}");
        let store = SqliteCacheStore::open(path).map_err(|source| CliError::OpenCache {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::Sqlite(store))
    }
}

impl CacheStore for CliCacheStore {
    type Error = SqliteCacheStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            Self::Memory(store) => store.get(key).map_err(|never| match never {}),
            Self::Sqlite(store) => store.get(key),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            Self::Memory(store) => store.put(key, value).map_err(|never| match never {}),
            Self::Sqlite(store) => store.put(key, value),
        }
    }
}
