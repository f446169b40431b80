//! Core types for locating transit vehicles and routes.
//!
//! The crate resolves a user's (vehicle, route) selection into a GeoJSON
//! collection of trip features. Resolution consults a time-bounded cache
//! first and falls back to a remote [`TripSource`]; results are published to
//! a [`ResultSink`] as versioned [`ResolutionState`] snapshots.
//!
//! Everything runs on one thread. Traits use `async_trait(?Send)` and the
//! resolver keeps its state in cells, so overlapping cycles can be driven
//! cooperatively while only the newest one is allowed to commit.

pub mod cache;
pub mod ids;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod trip;
pub mod view;

#[doc(hidden)]
pub mod test_support;

pub use cache::{CacheEntry, CacheStore, Clock, MemoryCacheStore, SystemClock, TripCache};
pub use ids::{CacheKey, Dimension, IdentifierPair, Lookup, RouteRef, VehicleRef};
pub use resolver::{QueryResolver, ResolutionState, ResolutionStatus, ResolveError, ResolverConfig};
pub use sink::{NullSink, RedrawTracker, RenderInstruction, ResultSink};
pub use source::{Suggestions, TripSource, TripSourceError};
pub use trip::{MissingProperties, TripCollection, TripDetails};
pub use view::MapView;
