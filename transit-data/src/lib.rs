//! Data access for the transit locator.
//!
//! Responsibilities:
//! - Implement [`transit_core::TripSource`] over the trip service's HTTP API.
//! - Decode wire formats into core types.
//!
//! Boundaries:
//! - Do not encode resolution rules (those live in `transit-core`).
//! - Keep blocking I/O off async executors; the HTTP client is async.

pub mod trips;

pub use trips::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpTripSource, HttpTripSourceConfig, SourceBuildError,
};
