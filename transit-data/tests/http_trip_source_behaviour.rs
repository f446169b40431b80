#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural tests for [`HttpTripSource`] against a canned HTTP service.

mod support;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{CannedResponse, CannedServer, EMPTY_COLLECTION, trips_body};
use transit_core::{
    RouteRef, Suggestions, TripCollection, TripSource, TripSourceError, VehicleRef,
};
use transit_data::{HttpTripSource, HttpTripSourceConfig};

/// Shared state for one scenario.
struct HttpWorld {
    routes: RefCell<HashMap<String, CannedResponse>>,
    timeout: Cell<Duration>,
    server: RefCell<Option<CannedServer>>,
    trips: RefCell<Option<Result<TripCollection, TripSourceError>>>,
    suggestions: RefCell<Option<Result<Suggestions, TripSourceError>>>,
    ready: RefCell<Option<Result<bool, TripSourceError>>>,
}

impl HttpWorld {
    fn serve(&self, path: &str, response: CannedResponse) {
        self.routes.borrow_mut().insert(path.to_owned(), response);
    }

    /// Start the server on first use and run `call` against a fresh source.
    fn call<R>(&self, call: impl AsyncFnOnce(&HttpTripSource) -> R) -> R {
        if self.server.borrow().is_none() {
            let routes = std::mem::take(&mut *self.routes.borrow_mut());
            *self.server.borrow_mut() = Some(CannedServer::start(routes));
        }
        let guard = self.server.borrow();
        let server = guard.as_ref().expect("server started");
        let config = HttpTripSourceConfig::new(server.base_url()).with_timeout(self.timeout.get());
        let source = HttpTripSource::with_config(config).expect("valid source");
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(call(&source))
    }

    fn requests(&self) -> Vec<String> {
        self.server
            .borrow()
            .as_ref()
            .map(CannedServer::requests)
            .unwrap_or_default()
    }

    fn trips(&self) -> Result<TripCollection, TripSourceError> {
        self.trips.borrow().clone().expect("trips were requested")
    }
}

#[fixture]
fn world() -> HttpWorld {
    HttpWorld {
        routes: RefCell::new(HashMap::new()),
        timeout: Cell::new(Duration::from_secs(5)),
        server: RefCell::new(None),
        trips: RefCell::new(None),
        suggestions: RefCell::new(None),
        ready: RefCell::new(None),
    }
}

// --- Given steps ---

#[given("a trip service with two trips for vehicle NYCT_2257")]
fn vehicle_trips(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getBusTripByVehRef/NYCT_2257",
        CannedResponse::json(trips_body("MTA NYCT_2257", "B6")),
    );
}

#[given("a trip service with two trips on route B6")]
fn route_trips(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getBusTripByPubLineName/B6",
        CannedResponse::json(trips_body("MTA NYCT_2257", "B6")),
    );
}

#[given("a trip service with no trips for vehicle NYCT_2257")]
fn vehicle_without_trips(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getBusTripByVehRef/NYCT_2257",
        CannedResponse::json(EMPTY_COLLECTION),
    );
}

#[given("a trip service answering vehicle NYCT_2257 with malformed JSON")]
fn vehicle_malformed(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getBusTripByVehRef/NYCT_2257",
        CannedResponse::json(r#"{"type": "FeatureCollection", "features": ["#),
    );
}

#[given("a trip service with no canned responses")]
fn no_responses(#[from(world)] world: &HttpWorld) {
    let _ = world;
}

#[given("a trip service listing vehicles and routes in mixed shapes")]
fn mixed_lists(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getVehRef",
        CannedResponse::json(r#"["NYCT_1", {"label": "NYCT_2"}, "", {"label": null}]"#),
    );
    world.serve(
        "/getPubLineName",
        CannedResponse::json(r#"[{"label": "B6"}, 44, {"other": true}]"#),
    );
}

#[given("a trip service whose readiness probe answers {status}")]
fn readiness(#[from(world)] world: &HttpWorld, status: u16) {
    world.serve("/ready", CannedResponse::status(status, "{}"));
}

#[given("a trip service that answers vehicle NYCT_2257 after two seconds")]
fn slow_vehicle(#[from(world)] world: &HttpWorld) {
    world.serve(
        "/getBusTripByVehRef/NYCT_2257",
        CannedResponse::json(trips_body("MTA NYCT_2257", "B6")).delayed(Duration::from_secs(2)),
    );
}

#[given("a request timeout of one second")]
fn short_timeout(#[from(world)] world: &HttpWorld) {
    world.timeout.set(Duration::from_secs(1));
}

// --- When steps ---

#[when("I request trips for vehicle {vehicle}")]
fn request_vehicle(#[from(world)] world: &HttpWorld, vehicle: String) {
    let vehicle = VehicleRef::new(vehicle);
    let result = world.call(async |source| source.trips_by_vehicle(&vehicle).await);
    *world.trips.borrow_mut() = Some(result);
}

#[when("I request trips for route {route}")]
fn request_route(#[from(world)] world: &HttpWorld, route: String) {
    let route = RouteRef::new(route);
    let result = world.call(async |source| source.trips_by_route(&route).await);
    *world.trips.borrow_mut() = Some(result);
}

#[when("I request the lookup lists")]
fn request_lists(#[from(world)] world: &HttpWorld) {
    let result = world.call(async |source| source.lookup_lists().await);
    *world.suggestions.borrow_mut() = Some(result);
}

#[when("I probe readiness")]
fn probe(#[from(world)] world: &HttpWorld) {
    let result = world.call(async |source| source.is_ready().await);
    *world.ready.borrow_mut() = Some(result);
}

// --- Then steps ---

#[then("{count} trips are returned")]
fn trips_returned(#[from(world)] world: &HttpWorld, count: usize) {
    let trips = world.trips().expect("expected trips");
    assert_eq!(trips.len(), count);
}

#[then("the service saw a request for \"{path}\"")]
fn saw_request(#[from(world)] world: &HttpWorld, path: String) {
    let requests = world.requests();
    assert!(
        requests.contains(&path),
        "expected a request for {path}, saw {requests:?}"
    );
}

#[then("an empty result error is returned")]
fn empty_result(#[from(world)] world: &HttpWorld) {
    let result = world.trips();
    assert!(
        matches!(result, Err(TripSourceError::EmptyResult)),
        "expected EmptyResult, got {result:?}"
    );
}

#[then("an HTTP 404 error is returned")]
fn not_found(#[from(world)] world: &HttpWorld) {
    let result = world.trips();
    assert!(
        matches!(result, Err(TripSourceError::Http { status: 404, .. })),
        "expected HTTP 404, got {result:?}"
    );
}

#[then("a decode error is returned")]
fn decode_error(#[from(world)] world: &HttpWorld) {
    let result = world.trips();
    assert!(
        matches!(result, Err(TripSourceError::Decode { .. })),
        "expected Decode, got {result:?}"
    );
}

#[then("a timeout error is returned")]
fn timeout_error(#[from(world)] world: &HttpWorld) {
    let result = world.trips();
    assert!(
        matches!(
            result,
            Err(TripSourceError::Timeout {
                timeout_secs: 1,
                ..
            })
        ),
        "expected Timeout, got {result:?}"
    );
}

#[then("the vehicle suggestions are NYCT_1, NYCT_2")]
fn vehicle_suggestions(#[from(world)] world: &HttpWorld) {
    let suggestions = world
        .suggestions
        .borrow()
        .clone()
        .expect("lists were requested")
        .expect("expected lookup lists");
    assert_eq!(suggestions.vehicles, ["NYCT_1", "NYCT_2"]);
}

#[then("the route suggestions are B6, 44")]
fn route_suggestions(#[from(world)] world: &HttpWorld) {
    let suggestions = world
        .suggestions
        .borrow()
        .clone()
        .expect("lists were requested")
        .expect("expected lookup lists");
    assert_eq!(suggestions.routes, ["B6", "44"]);
}

#[then("the service is ready")]
fn is_ready(#[from(world)] world: &HttpWorld) {
    let ready = world.ready.borrow().clone().expect("readiness was probed");
    assert_eq!(ready, Ok(true));
}

#[then("the service is not ready")]
fn is_not_ready(#[from(world)] world: &HttpWorld) {
    let ready = world.ready.borrow().clone().expect("readiness was probed");
    assert_eq!(ready, Ok(false));
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_trip_source.feature", name = $title)]
        fn $fn_name(world: HttpWorld) {
            let _ = world;
        }
    };
}

register_scenario!(fetching_vehicle_trips, "fetching trips for a vehicle");
register_scenario!(fetching_route_trips, "fetching trips for a route");
register_scenario!(
    empty_collection_is_empty_result,
    "an empty collection is reported as an empty result"
);
register_scenario!(
    unknown_vehicle_surfaces_status,
    "an unknown vehicle surfaces the HTTP status"
);
register_scenario!(malformed_body_is_decode_error, "a malformed body is a decode error");
register_scenario!(
    identifiers_are_percent_encoded,
    "identifiers are percent-encoded into one path segment"
);
register_scenario!(
    lookup_lists_accept_mixed_shapes,
    "lookup lists accept mixed entry shapes"
);
register_scenario!(healthy_service_is_ready, "a healthy service reports ready");
register_scenario!(degraded_service_is_not_ready, "a degraded service reports not ready");
register_scenario!(slow_service_times_out, "a slow service times out");
