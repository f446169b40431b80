//! HTTP trip source for the bus-trip service.
//!
//! [`HttpTripSource`] implements [`transit_core::TripSource`] against the
//! service's read endpoints:
//!
//! | Operation        | Path                                   |
//! | ---------------- | -------------------------------------- |
//! | readiness        | `GET /ready`                           |
//! | vehicle list     | `GET /getVehRef`                       |
//! | route list       | `GET /getPubLineName`                  |
//! | trips by vehicle | `GET /getBusTripByVehRef/{vehicleRef}` |
//! | trips by route   | `GET /getBusTripByPubLineName/{line}`  |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use transit_core::{TripSource, VehicleRef};
//! use transit_data::{HttpTripSource, HttpTripSourceConfig};
//!
//! let config = HttpTripSourceConfig::new("http://localhost:8000")
//!     .with_timeout(Duration::from_secs(10));
//! let source = HttpTripSource::with_config(config)?;
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
//! let trips = rt.block_on(source.trips_by_vehicle(&VehicleRef::new("NYCT_2257")))?;
//! println!("{} trips", trips.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod source;
mod wire;

pub use source::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpTripSource, HttpTripSourceConfig, SourceBuildError,
};
