//! The query resolver: turns an identifier pair into a published result.
//!
//! Each call to [`QueryResolver::resolve`] is one cycle. A cycle publishes
//! `Loading`, consults the cache, falls back to the trip service, applies the
//! optional line filter and commits exactly one terminal state. Cycles may
//! overlap on a single thread; every cycle carries a token and only the most
//! recently started cycle may commit. A superseded cycle changes nothing: no
//! state update, no cache write, no emission.

mod error;
mod state;

use std::cell::{Cell, RefCell};
use std::time::Duration;

use log::{debug, warn};

pub use error::ResolveError;
pub use state::{ResolutionState, ResolutionStatus};

use crate::cache::{CacheStore, Clock, DEFAULT_TTL, SystemClock, TripCache};
use crate::ids::{Dimension, IdentifierPair, Lookup, RouteRef, VehicleRef};
use crate::sink::ResultSink;
use crate::source::{Suggestions, TripSource};
use crate::trip::TripCollection;

/// Tunables for a [`QueryResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Cache time-to-live.
    pub ttl: Duration,
    /// Probe the service's readiness before remote fetches.
    pub health_check: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            health_check: false,
        }
    }
}

impl ResolverConfig {
    /// Override the cache time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable the readiness probe.
    #[must_use]
    pub const fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Vehicle(&'a VehicleRef),
    Route(&'a RouteRef),
}

impl<'a> Target<'a> {
    const fn dimension(self) -> Dimension {
        match self {
            Self::Vehicle(_) => Dimension::Vehicle,
            Self::Route(_) => Dimension::Route,
        }
    }

    fn id(self) -> &'a str {
        match self {
            Self::Vehicle(vehicle) => vehicle.as_str(),
            Self::Route(route) => route.as_str(),
        }
    }
}

/// Trips loaded for a target, remembering whether they came from the network.
struct Loaded {
    trips: TripCollection,
    remote: bool,
}

/// A completed cycle awaiting commit.
struct Cycle {
    outcome: Result<TripCollection, ResolveError>,
    write_back: Option<(Dimension, String, TripCollection)>,
}

/// Resolves identifier pairs against a cache and a trip service.
///
/// # Examples
/// ```
/// use transit_core::cache::MemoryCacheStore;
/// use transit_core::resolver::{QueryResolver, ResolutionStatus};
/// use transit_core::sink::NullSink;
/// use transit_core::test_support::{StubTripSource, trip_collection};
/// use transit_core::IdentifierPair;
///
/// let source = StubTripSource::default()
///     .with_route("B6", trip_collection(&[("NYCT_1", "B6"), ("NYCT_2", "B6")]));
/// let resolver = QueryResolver::new(source, MemoryCacheStore::new(), NullSink);
/// let rt = tokio::runtime::Builder::new_current_thread().build()?;
///
/// let state = rt.block_on(resolver.resolve(&IdentifierPair::from_input(None, Some("B6"))));
/// assert_eq!(state.status, ResolutionStatus::Ready);
/// assert_eq!(state.version, 1);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct QueryResolver<T, S, K, C = SystemClock> {
    source: T,
    cache: TripCache<S, C>,
    sink: K,
    health_check: bool,
    latest_token: Cell<u64>,
    state: RefCell<ResolutionState>,
}

impl<T, S, K> QueryResolver<T, S, K, SystemClock>
where
    T: TripSource,
    S: CacheStore,
    K: ResultSink,
{
    /// Resolver with default configuration and the system clock.
    #[must_use]
    pub fn new(source: T, store: S, sink: K) -> Self {
        Self::with_config(source, store, SystemClock, sink, &ResolverConfig::default())
    }
}

impl<T, S, K, C> QueryResolver<T, S, K, C>
where
    T: TripSource,
    S: CacheStore,
    K: ResultSink,
    C: Clock,
{
    /// Resolver with explicit clock and configuration.
    #[must_use]
    pub fn with_config(source: T, store: S, clock: C, sink: K, config: &ResolverConfig) -> Self {
        Self {
            source,
            cache: TripCache::new(store, clock).with_ttl(config.ttl),
            sink,
            health_check: config.health_check,
            latest_token: Cell::new(0),
            state: RefCell::new(ResolutionState::default()),
        }
    }

    /// Enable or disable the readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Borrow the trip source.
    #[must_use]
    pub const fn source(&self) -> &T {
        &self.source
    }

    /// Borrow the cache.
    #[must_use]
    pub const fn cache(&self) -> &TripCache<S, C> {
        &self.cache
    }

    /// Borrow the sink.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Snapshot of the current result.
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.state.borrow().clone()
    }

    /// Run one resolution cycle for `pair`.
    ///
    /// Returns the state this cycle committed, or the current state when a
    /// newer cycle started before this one finished.
    pub async fn resolve(&self, pair: &IdentifierPair) -> ResolutionState {
        let token = self.latest_token.get().wrapping_add(1);
        self.latest_token.set(token);

        let Some(lookup) = pair.lookup() else {
            return self.commit(|state| {
                state.data = None;
                state.status = ResolutionStatus::Idle;
                state.message = None;
            });
        };

        self.commit(|state| {
            state.data = None;
            state.status = ResolutionStatus::Loading;
            state.message = None;
        });

        let cycle = self.run_cycle(lookup).await;
        self.finalise(token, cycle)
    }

    /// Fetch lookup lists and publish them.
    ///
    /// Failures are logged and yield empty lists.
    pub async fn load_suggestions(&self) -> Suggestions {
        let suggestions = self.source.lookup_lists().await.unwrap_or_else(|err| {
            warn!("failed to load lookup lists: {err}");
            Suggestions::default()
        });
        self.sink.publish_suggestions(&suggestions);
        suggestions
    }

    async fn run_cycle(&self, lookup: Lookup<'_>) -> Cycle {
        match lookup {
            Lookup::Vehicle { vehicle, line } => {
                let loaded = match self.load(Target::Vehicle(vehicle)).await {
                    Ok(loaded) => loaded,
                    Err(err) => return Cycle::failed(err),
                };
                let shown = match line {
                    Some(route) => loaded.trips.filter_by_line(route),
                    None => loaded.trips.clone(),
                };
                if shown.is_empty() {
                    // Only reachable with a line filter; `load` rejects empty payloads.
                    let err = line.map_or_else(
                        || ResolveError::EmptyResult {
                            dimension: Dimension::Vehicle,
                            id: vehicle.to_string(),
                        },
                        |route| ResolveError::FilterExhausted {
                            vehicle: vehicle.clone(),
                            route: route.clone(),
                        },
                    );
                    return Cycle::failed(err);
                }
                Cycle::succeeded(shown, Target::Vehicle(vehicle), loaded)
            }
            Lookup::Route(route) => match self.load(Target::Route(route)).await {
                Ok(loaded) => Cycle::succeeded(loaded.trips.clone(), Target::Route(route), loaded),
                Err(err) => Cycle::failed(err),
            },
        }
    }

    async fn load(&self, target: Target<'_>) -> Result<Loaded, ResolveError> {
        let dimension = target.dimension();
        let id = target.id();

        let (trips, remote) = if let Some(entry) = self.cache.get(dimension, id) {
            debug!("cache hit for {}", entry.key);
            (entry.payload, false)
        } else {
            self.ensure_ready().await?;
            let fetched = match target {
                Target::Vehicle(vehicle) => self.source.trips_by_vehicle(vehicle).await,
                Target::Route(route) => self.source.trips_by_route(route).await,
            };
            let trips = fetched.map_err(|err| ResolveError::from_source(dimension, id, err))?;
            (trips, true)
        };

        if trips.is_empty() {
            return Err(ResolveError::EmptyResult {
                dimension,
                id: id.to_owned(),
            });
        }
        Ok(Loaded { trips, remote })
    }

    async fn ensure_ready(&self) -> Result<(), ResolveError> {
        if !self.health_check {
            return Ok(());
        }
        match self.source.is_ready().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ResolveError::ServiceUnavailable),
            Err(err) => {
                warn!("readiness probe failed: {err}");
                Err(ResolveError::ServiceUnavailable)
            }
        }
    }

    fn finalise(&self, token: u64, cycle: Cycle) -> ResolutionState {
        if token != self.latest_token.get() {
            debug!("discarding result of superseded cycle {token}");
            return self.state();
        }

        match cycle.outcome {
            Ok(trips) => {
                if let Some((dimension, id, payload)) = cycle.write_back
                    && let Err(err) = self.cache.put(dimension, &id, &payload)
                {
                    warn!("failed to cache {dimension} {id}: {err}");
                }
                self.commit(|state| {
                    state.version = state.version.saturating_add(1);
                    state.data = Some(trips);
                    state.status = ResolutionStatus::Ready;
                    state.message = None;
                })
            }
            Err(err) => {
                debug!("resolution failed: {}", err.describe());
                self.commit(|state| {
                    state.data = None;
                    state.status = err.status();
                    state.message = Some(err.describe());
                })
            }
        }
    }

    fn commit(&self, update: impl FnOnce(&mut ResolutionState)) -> ResolutionState {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            update(&mut state);
            state.clone()
        };
        self.sink.publish(&snapshot);
        snapshot
    }
}

impl Cycle {
    const fn failed(err: ResolveError) -> Self {
        Self {
            outcome: Err(err),
            write_back: None,
        }
    }

    fn succeeded(shown: TripCollection, target: Target<'_>, loaded: Loaded) -> Self {
        let write_back = loaded
            .remote
            .then(|| (target.dimension(), target.id().to_owned(), loaded.trips));
        Self {
            outcome: Ok(shown),
            write_back,
        }
    }
}
