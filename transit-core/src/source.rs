//! Remote trip lookups.
//!
//! [`TripSource`] is the seam between the resolver and whatever serves trip
//! data. Implementations must treat an empty feature collection as
//! [`TripSourceError::EmptyResult`] so callers never see an empty success.

use async_trait::async_trait;
use futures_util::future::try_join;
use serde::Serialize;
use thiserror::Error;

use crate::ids::{RouteRef, VehicleRef};
use crate::trip::TripCollection;

/// Errors raised while talking to a trip data service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripSourceError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request exceeded its deadline.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The request never produced a response.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body was not the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Parser detail.
        message: String,
    },
    /// The lookup succeeded but returned no features.
    #[error("lookup returned no features")]
    EmptyResult,
}

/// Selectable identifiers offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Known vehicle references.
    pub vehicles: Vec<String>,
    /// Known route references.
    pub routes: Vec<String>,
}

/// Fetch trip collections and lookup lists from a remote service.
///
/// # Examples
/// ```
/// use transit_core::{RouteRef, TripSource, VehicleRef};
/// use transit_core::test_support::{StubTripSource, trip_collection};
///
/// let source = StubTripSource::default()
///     .with_vehicle("NYCT_2257", trip_collection(&[("NYCT_2257", "B6")]));
/// let rt = tokio::runtime::Builder::new_current_thread().build()?;
/// let trips = rt.block_on(source.trips_by_vehicle(&VehicleRef::new("NYCT_2257")))?;
/// assert_eq!(trips.len(), 1);
/// assert!(rt.block_on(source.trips_by_route(&RouteRef::new("B6"))).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[async_trait(?Send)]
pub trait TripSource {
    /// Trips run by `vehicle`.
    ///
    /// # Errors
    /// Returns [`TripSourceError::EmptyResult`] when the service has no
    /// features for the vehicle, or a transport error.
    async fn trips_by_vehicle(&self, vehicle: &VehicleRef)
    -> Result<TripCollection, TripSourceError>;

    /// Trips on the published line `route`.
    ///
    /// # Errors
    /// As for [`TripSource::trips_by_vehicle`].
    async fn trips_by_route(&self, route: &RouteRef) -> Result<TripCollection, TripSourceError>;

    /// Every known vehicle reference.
    async fn vehicle_refs(&self) -> Result<Vec<String>, TripSourceError>;

    /// Every known route reference.
    async fn route_refs(&self) -> Result<Vec<String>, TripSourceError>;

    /// Probe the service's readiness endpoint.
    async fn is_ready(&self) -> Result<bool, TripSourceError>;

    /// Fetch both lookup lists concurrently.
    ///
    /// Fails as a whole when either list fails.
    async fn lookup_lists(&self) -> Result<Suggestions, TripSourceError> {
        let (vehicles, routes) = try_join(self.vehicle_refs(), self.route_refs()).await?;
        Ok(Suggestions { vehicles, routes })
    }
}

#[async_trait(?Send)]
impl<T: TripSource + ?Sized> TripSource for Box<T> {
    async fn trips_by_vehicle(
        &self,
        vehicle: &VehicleRef,
    ) -> Result<TripCollection, TripSourceError> {
        (**self).trips_by_vehicle(vehicle).await
    }

    async fn trips_by_route(&self, route: &RouteRef) -> Result<TripCollection, TripSourceError> {
        (**self).trips_by_route(route).await
    }

    async fn vehicle_refs(&self) -> Result<Vec<String>, TripSourceError> {
        (**self).vehicle_refs().await
    }

    async fn route_refs(&self) -> Result<Vec<String>, TripSourceError> {
        (**self).route_refs().await
    }

    async fn is_ready(&self) -> Result<bool, TripSourceError> {
        (**self).is_ready().await
    }

    async fn lookup_lists(&self) -> Result<Suggestions, TripSourceError> {
        (**self).lookup_lists().await
    }
}
