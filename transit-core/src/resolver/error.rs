//! Failures of a resolution cycle.

use std::error::Error as StdError;

use thiserror::Error;

use super::state::ResolutionStatus;
use crate::ids::{Dimension, RouteRef, VehicleRef};
use crate::source::TripSourceError;

/// Why a resolution cycle produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The trip service failed.
    #[error("failed to fetch {dimension} {id}")]
    Remote {
        /// Lookup dimension.
        dimension: Dimension,
        /// Requested identifier.
        id: String,
        /// Transport failure.
        #[source]
        source: TripSourceError,
    },
    /// The service knows nothing about the identifier.
    #[error("no data for {dimension} {id}")]
    EmptyResult {
        /// Lookup dimension.
        dimension: Dimension,
        /// Requested identifier.
        id: String,
    },
    /// The vehicle was found but none of its trips run on the requested line.
    #[error("no route data found for VehicleRef \"{vehicle}\" and PublicRef \"{route}\"")]
    FilterExhausted {
        /// Requested vehicle.
        vehicle: VehicleRef,
        /// Requested line.
        route: RouteRef,
    },
    /// The readiness probe reported the service as unavailable.
    #[error("trip service is unavailable")]
    ServiceUnavailable,
}

impl ResolveError {
    /// Classify a [`TripSourceError`] raised for `id`.
    #[must_use]
    pub fn from_source(dimension: Dimension, id: &str, source: TripSourceError) -> Self {
        match source {
            TripSourceError::EmptyResult => Self::EmptyResult {
                dimension,
                id: id.to_owned(),
            },
            other => Self::Remote {
                dimension,
                id: id.to_owned(),
                source: other,
            },
        }
    }

    /// Status to publish for this failure.
    #[must_use]
    pub const fn status(&self) -> ResolutionStatus {
        match self {
            Self::Remote { .. } | Self::ServiceUnavailable => ResolutionStatus::Error,
            Self::EmptyResult { .. } | Self::FilterExhausted { .. } => ResolutionStatus::Empty,
        }
    }

    /// Render the error and its causes as one line.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            text.push_str(": ");
            text.push_str(&err.to_string());
            cause = err.source();
        }
        text
    }
}
