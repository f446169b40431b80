//! Facade crate for the transit locator.
//!
//! Re-exports the resolution core and, behind the `http` feature, the HTTP
//! trip source. The SQLite cache store is available with `store-sqlite`.

#![forbid(unsafe_code)]

pub use transit_core::{
    CacheStore, Clock, IdentifierPair, MapView, MemoryCacheStore, QueryResolver,
    ResolutionState, ResolutionStatus, ResolveError, ResolverConfig, ResultSink, RouteRef,
    Suggestions, SystemClock, TripCache, TripCollection, TripDetails, TripSource,
    TripSourceError, VehicleRef,
};

#[cfg(feature = "store-sqlite")]
pub use transit_core::cache::{SqliteCacheStore, SqliteCacheStoreError};

#[cfg(feature = "http")]
pub use transit_data::{HttpTripSource, HttpTripSourceConfig, SourceBuildError};
