//! Time-bounded cache of trip collections.
//!
//! The module splits caching into two layers:
//!
//! - [`CacheStore`]: a raw string key/value store. [`MemoryCacheStore`] keeps
//!   entries in process; `SqliteCacheStore` (feature `store-sqlite`) persists
//!   them across runs.
//! - [`TripCache`]: serialises trip collections into timestamped records,
//!   enforces the time-to-live and turns unreadable entries into misses.
//!
//! Records are stored as JSON objects `{"data": <FeatureCollection>,
//! "timestamp": <milliseconds since epoch>}` under keys such as
//! `vehicle:NYCT_2257`.

mod clock;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use clock::{Clock, SystemClock};
pub use memory::MemoryCacheStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteCacheStore, SqliteCacheStoreError};

use crate::ids::{CacheKey, Dimension};
use crate::trip::TripCollection;

/// Default lifetime of a cache entry: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Raw persistence for cache records.
///
/// Implementations store opaque strings; they know nothing about expiry.
pub trait CacheStore {
    /// Backend failure type.
    type Error: std::error::Error + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns the backend's error when the read cannot be performed.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns the backend's error when the write cannot be performed.
    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Errors encountered while reading a cache entry.
///
/// [`TripCache::get`] logs these and reports a miss.
#[derive(Debug, Error)]
pub enum CacheReadError {
    /// The backend could not be read.
    #[error("failed to read cache entry {key}")]
    Backend {
        /// Cache key.
        key: String,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + 'static>,
    },
    /// The stored value is not a valid record.
    #[error("malformed cache entry {key}")]
    Malformed {
        /// Cache key.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors encountered while writing a cache entry.
#[derive(Debug, Error)]
pub enum CacheWriteError {
    /// The payload could not be encoded.
    #[error("failed to encode cache entry {key}")]
    Encode {
        /// Cache key.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The backend rejected the write.
    #[error("failed to write cache entry {key}")]
    Backend {
        /// Cache key.
        key: String,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + 'static>,
    },
}

/// A fresh cache hit.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Key the entry was stored under.
    pub key: CacheKey,
    /// Cached trip collection.
    pub payload: TripCollection,
    /// When the entry was written, as time since the Unix epoch.
    pub stored_at: Duration,
}

#[derive(Serialize)]
struct RecordOut<'a> {
    data: &'a TripCollection,
    timestamp: u64,
}

#[derive(Deserialize)]
struct RecordIn {
    data: TripCollection,
    timestamp: u64,
}

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Trip collection cache with a fixed time-to-live.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use transit_core::cache::{MemoryCacheStore, TripCache};
/// use transit_core::test_support::{ManualClock, trip_collection};
/// use transit_core::Dimension;
///
/// let clock = ManualClock::new(Duration::from_secs(1_000));
/// let cache = TripCache::new(MemoryCacheStore::new(), &clock);
/// cache.put(Dimension::Route, "B6", &trip_collection(&[("NYCT_1", "B6")]))?;
/// assert!(cache.get(Dimension::Route, "B6").is_some());
///
/// clock.advance(Duration::from_secs(300));
/// assert!(cache.get(Dimension::Route, "B6").is_none());
/// # Ok::<(), transit_core::cache::CacheWriteError>(())
/// ```
#[derive(Debug)]
pub struct TripCache<S, C = SystemClock> {
    store: S,
    clock: C,
    ttl: Duration,
}

impl<S: CacheStore> TripCache<S, SystemClock> {
    /// Cache backed by `store` using the system clock.
    #[must_use]
    pub const fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: CacheStore, C: Clock> TripCache<S, C> {
    /// Cache backed by `store`, timed by `clock`, with [`DEFAULT_TTL`].
    #[must_use]
    pub const fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Return the entry for `id` when it exists and is younger than the TTL.
    ///
    /// Unreadable or malformed entries are logged and treated as absent.
    pub fn get(&self, dimension: Dimension, id: &str) -> Option<CacheEntry> {
        match self.read(dimension, id) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("ignoring cache entry: {err}");
                None
            }
        }
    }

    /// Like [`TripCache::get`] but surfaces read failures.
    ///
    /// # Errors
    /// Returns [`CacheReadError`] when the backend fails or the stored value
    /// is not a valid record.
    pub fn read(
        &self,
        dimension: Dimension,
        id: &str,
    ) -> Result<Option<CacheEntry>, CacheReadError> {
        let key = CacheKey::new(dimension, id);
        let Some(raw) = self
            .store
            .get(key.as_str())
            .map_err(|err| CacheReadError::Backend {
                key: key.to_string(),
                source: Box::new(err),
            })?
        else {
            return Ok(None);
        };
        let record: RecordIn =
            serde_json::from_str(&raw).map_err(|source| CacheReadError::Malformed {
                key: key.to_string(),
                source,
            })?;
        let stored_at = Duration::from_millis(record.timestamp);
        let age = self.clock.now().saturating_sub(stored_at);
        if age >= self.ttl {
            debug!("cache entry {key} expired after {}ms", age.as_millis());
            return Ok(None);
        }
        Ok(Some(CacheEntry {
            key,
            payload: record.data,
            stored_at,
        }))
    }

    /// Store `payload` for `id`, stamped with the current time.
    ///
    /// # Errors
    /// Returns [`CacheWriteError`] when encoding or the backend write fails.
    pub fn put(
        &self,
        dimension: Dimension,
        id: &str,
        payload: &TripCollection,
    ) -> Result<(), CacheWriteError> {
        let key = CacheKey::new(dimension, id);
        let record = RecordOut {
            data: payload,
            timestamp: to_millis(self.clock.now()),
        };
        let raw = serde_json::to_string(&record).map_err(|source| CacheWriteError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store
            .put(key.as_str(), &raw)
            .map_err(|err| CacheWriteError::Backend {
                key: key.to_string(),
                source: Box::new(err),
            })
    }
}
