//! Shared fixtures for resolver, cache and renderer tests.
//!
//! Exposed publicly so downstream crates and integration tests can drive the
//! resolver without a network or wall clock.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use geojson::{Feature, Geometry, Value};
use serde_json::{Map, Value as JsonValue};
use tokio::sync::Notify;

use crate::cache::Clock;
use crate::ids::{RouteRef, VehicleRef};
use crate::resolver::{ResolutionState, ResolutionStatus};
use crate::sink::ResultSink;
use crate::source::{Suggestions, TripSource, TripSourceError};
use crate::trip::{
    PROP_DESTINATION_NAME, PROP_DIRECTION_REF, PROP_END_TIME, PROP_ORIGIN_NAME,
    PROP_PUBLISHED_LINE_NAME, PROP_START_TIME, PROP_VEHICLE_REF, TripCollection,
};

/// Build a trip feature located at (`lon`, `lat`) with every displayed
/// property populated.
#[must_use]
pub fn trip_feature(vehicle: &str, line: &str, lon: f64, lat: f64) -> Feature {
    let mut properties = Map::new();
    for (name, value) in [
        (PROP_VEHICLE_REF, vehicle),
        (PROP_PUBLISHED_LINE_NAME, line),
        (PROP_DIRECTION_REF, "0"),
        (PROP_ORIGIN_NAME, "JAMAICA 165 ST TERM"),
        (PROP_DESTINATION_NAME, "MERRICK BLVD"),
        (PROP_START_TIME, "2024-05-01T08:00:00-04:00"),
        (PROP_END_TIME, "2024-05-01T08:45:00-04:00"),
    ] {
        properties.insert(name.to_owned(), JsonValue::String(value.to_owned()));
    }
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build a collection with one feature per `(vehicle, line)` pair, all at the
/// default map centre.
#[must_use]
pub fn trip_collection(trips: &[(&str, &str)]) -> TripCollection {
    trips
        .iter()
        .map(|(vehicle, line)| trip_feature(vehicle, line, -73.809_474, 40.705_808))
        .collect()
}

/// Calls observed by [`StubTripSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceCall {
    /// `trips_by_vehicle` for the given id.
    Vehicle(String),
    /// `trips_by_route` for the given id.
    Route(String),
    /// `vehicle_refs`.
    VehicleRefs,
    /// `route_refs`.
    RouteRefs,
    /// `is_ready`.
    Health,
}

type Canned<T> = Result<T, TripSourceError>;

/// In-memory [`TripSource`] with canned responses and a call log.
///
/// Unknown identifiers answer with HTTP 404. Empty collections answer with
/// [`TripSourceError::EmptyResult`], as a real source would.
#[derive(Debug)]
pub struct StubTripSource {
    vehicles: HashMap<String, Canned<TripCollection>>,
    routes: HashMap<String, Canned<TripCollection>>,
    vehicle_refs: Canned<Vec<String>>,
    route_refs: Canned<Vec<String>>,
    ready: Canned<bool>,
    holds: RefCell<HashMap<String, Gate>>,
    calls: RefCell<Vec<SourceCall>>,
}

impl Default for StubTripSource {
    fn default() -> Self {
        Self {
            vehicles: HashMap::new(),
            routes: HashMap::new(),
            vehicle_refs: Ok(Vec::new()),
            route_refs: Ok(Vec::new()),
            ready: Ok(true),
            holds: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl StubTripSource {
    /// Answer `trips_by_vehicle(id)` with `trips`.
    #[must_use]
    pub fn with_vehicle(mut self, id: &str, trips: TripCollection) -> Self {
        self.vehicles.insert(id.to_owned(), Ok(trips));
        self
    }

    /// Fail `trips_by_vehicle(id)` with `error`.
    #[must_use]
    pub fn with_vehicle_error(mut self, id: &str, error: TripSourceError) -> Self {
        self.vehicles.insert(id.to_owned(), Err(error));
        self
    }

    /// Answer `trips_by_route(id)` with `trips`.
    #[must_use]
    pub fn with_route(mut self, id: &str, trips: TripCollection) -> Self {
        self.routes.insert(id.to_owned(), Ok(trips));
        self
    }

    /// Fail `trips_by_route(id)` with `error`.
    #[must_use]
    pub fn with_route_error(mut self, id: &str, error: TripSourceError) -> Self {
        self.routes.insert(id.to_owned(), Err(error));
        self
    }

    /// Answer the lookup-list calls.
    #[must_use]
    pub fn with_lookup_lists(mut self, vehicles: Vec<String>, routes: Vec<String>) -> Self {
        self.vehicle_refs = Ok(vehicles);
        self.route_refs = Ok(routes);
        self
    }

    /// Fail the vehicle list call.
    #[must_use]
    pub fn with_vehicle_refs_error(mut self, error: TripSourceError) -> Self {
        self.vehicle_refs = Err(error);
        self
    }

    /// Fail the route list call.
    #[must_use]
    pub fn with_route_refs_error(mut self, error: TripSourceError) -> Self {
        self.route_refs = Err(error);
        self
    }

    /// Answer the readiness probe.
    #[must_use]
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = Ok(ready);
        self
    }

    /// Fail the readiness probe.
    #[must_use]
    pub fn with_ready_error(mut self, error: TripSourceError) -> Self {
        self.ready = Err(error);
        self
    }

    /// Suspend `trips_by_vehicle(id)` until the returned gate opens.
    pub fn hold_vehicle(&self, id: &str) -> Gate {
        let gate = Gate::default();
        self.holds.borrow_mut().insert(id.to_owned(), gate.clone());
        gate
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.borrow().clone()
    }

    /// How many times `call` was made.
    pub fn count(&self, call: &SourceCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    /// Number of trip fetches (vehicle or route).
    pub fn fetches(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SourceCall::Vehicle(_) | SourceCall::Route(_)))
            .count()
    }

    fn record(&self, call: SourceCall) {
        self.calls.borrow_mut().push(call);
    }

    fn answer(
        canned: Option<&Canned<TripCollection>>,
        path: &str,
        id: &str,
    ) -> Canned<TripCollection> {
        match canned {
            Some(Ok(trips)) => trips.clone().non_empty().ok_or(TripSourceError::EmptyResult),
            Some(Err(err)) => Err(err.clone()),
            None => Err(TripSourceError::Http {
                url: format!("stub://{path}/{id}"),
                status: 404,
                message: "not found".to_owned(),
            }),
        }
    }
}

#[async_trait(?Send)]
impl TripSource for StubTripSource {
    async fn trips_by_vehicle(
        &self,
        vehicle: &VehicleRef,
    ) -> Result<TripCollection, TripSourceError> {
        self.record(SourceCall::Vehicle(vehicle.to_string()));
        let gate = self.holds.borrow().get(vehicle.as_str()).cloned();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        Self::answer(
            self.vehicles.get(vehicle.as_str()),
            "getBusTripByVehRef",
            vehicle,
        )
    }

    async fn trips_by_route(&self, route: &RouteRef) -> Result<TripCollection, TripSourceError> {
        self.record(SourceCall::Route(route.to_string()));
        Self::answer(
            self.routes.get(route.as_str()),
            "getBusTripByPubLineName",
            route,
        )
    }

    async fn vehicle_refs(&self) -> Result<Vec<String>, TripSourceError> {
        self.record(SourceCall::VehicleRefs);
        self.vehicle_refs.clone()
    }

    async fn route_refs(&self) -> Result<Vec<String>, TripSourceError> {
        self.record(SourceCall::RouteRefs);
        self.route_refs.clone()
    }

    async fn is_ready(&self) -> Result<bool, TripSourceError> {
        self.record(SourceCall::Health);
        self.ready.clone()
    }
}

/// Latch used to hold a stubbed call in flight.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    notify: Rc<Notify>,
}

impl Gate {
    /// Release the held call, or let the next wait pass straight through.
    pub fn open(&self) {
        self.notify.notify_one();
    }

    /// Wait until the gate opens.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Clock reading `start` since the epoch.
    pub fn new(start: Duration) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    /// Jump to an absolute reading.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Sink that records everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    states: RefCell<Vec<ResolutionState>>,
    suggestions: RefCell<Vec<Suggestions>>,
}

impl RecordingSink {
    /// Every published state, in order.
    pub fn states(&self) -> Vec<ResolutionState> {
        self.states.borrow().clone()
    }

    /// Status of every published state, in order.
    pub fn statuses(&self) -> Vec<ResolutionStatus> {
        self.states.borrow().iter().map(|s| s.status).collect()
    }

    /// The most recent state.
    pub fn last(&self) -> Option<ResolutionState> {
        self.states.borrow().last().cloned()
    }

    /// Every published suggestion list.
    pub fn suggestions(&self) -> Vec<Suggestions> {
        self.suggestions.borrow().clone()
    }

    /// Forget recorded emissions.
    pub fn clear(&self) {
        self.states.borrow_mut().clear();
        self.suggestions.borrow_mut().clear();
    }
}

impl ResultSink for RecordingSink {
    fn publish(&self, state: &ResolutionState) {
        self.states.borrow_mut().push(state.clone());
    }

    fn publish_suggestions(&self, suggestions: &Suggestions) {
        self.suggestions.borrow_mut().push(suggestions.clone());
    }
}
