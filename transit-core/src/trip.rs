//! Trip feature collections and the per-feature detail view.
//!
//! Remote lookups return a GeoJSON feature collection where each feature is
//! one trip record. [`TripCollection`] wraps the collection and provides the
//! operations the resolver and renderers need: the published-line filter,
//! detail extraction, and a bounding rectangle for framing the map.

use geo::{BoundingRect, Coord, MultiPoint, Rect};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::ids::RouteRef;

/// Property naming the vehicle a trip record belongs to.
pub const PROP_VEHICLE_REF: &str = "VehicleRef";
/// Property naming the rider-facing line.
pub const PROP_PUBLISHED_LINE_NAME: &str = "PublishedLineName";
/// Property naming the direction of travel.
pub const PROP_DIRECTION_REF: &str = "DirectionRef";
/// Property naming the first stop.
pub const PROP_ORIGIN_NAME: &str = "OriginName";
/// Property naming the last stop.
pub const PROP_DESTINATION_NAME: &str = "DestinationName";
/// Property holding the scheduled start time.
pub const PROP_START_TIME: &str = "StartTime";
/// Property holding the scheduled end time.
pub const PROP_END_TIME: &str = "EndTime";

/// Ordered set of trip features returned by a lookup.
///
/// Serialises as a plain GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripCollection(FeatureCollection);

impl TripCollection {
    /// Wrap an existing GeoJSON feature collection.
    #[must_use]
    pub const fn new(collection: FeatureCollection) -> Self {
        Self(collection)
    }

    /// Build a collection from a list of features.
    #[must_use]
    pub const fn from_features(features: Vec<Feature>) -> Self {
        Self(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Borrow the features in order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.0.features
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.features.is_empty()
    }

    /// Return the collection only when it has at least one feature.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Borrow the underlying GeoJSON collection.
    #[must_use]
    pub const fn as_feature_collection(&self) -> &FeatureCollection {
        &self.0
    }

    /// Consume the wrapper and return the GeoJSON collection.
    #[must_use]
    pub fn into_inner(self) -> FeatureCollection {
        self.0
    }

    /// Keep only features whose published line equals `line`.
    ///
    /// The receiver is left untouched; a new collection is returned with the
    /// surviving features in their original order.
    ///
    /// # Examples
    /// ```
    /// # use transit_core::{RouteRef, test_support::trip_collection};
    /// let trips = trip_collection(&[("NYCT_1", "B6"), ("NYCT_1", "B8")]);
    /// let narrowed = trips.filter_by_line(&RouteRef::new("B6"));
    /// assert_eq!(narrowed.len(), 1);
    /// assert_eq!(trips.len(), 2);
    /// ```
    #[must_use]
    pub fn filter_by_line(&self, line: &RouteRef) -> Self {
        let features = self
            .0
            .features
            .iter()
            .filter(|feature| {
                property_text(feature, PROP_PUBLISHED_LINE_NAME).as_deref() == Some(line.as_str())
            })
            .cloned()
            .collect();
        Self::from_features(features)
    }

    /// Extract the detail view of every feature, in order.
    #[must_use]
    pub fn details(&self) -> Vec<Result<TripDetails, MissingProperties>> {
        self.0.features.iter().map(TripDetails::from_feature).collect()
    }

    /// Bounding rectangle of every coordinate in the collection.
    ///
    /// Returns `None` when no feature carries usable geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let mut coords = Vec::new();
        for geometry in self.0.features.iter().filter_map(|f| f.geometry.as_ref()) {
            collect_geometry(geometry, &mut coords);
        }
        MultiPoint::from(coords).bounding_rect()
    }
}

impl From<FeatureCollection> for TripCollection {
    fn from(collection: FeatureCollection) -> Self {
        Self::new(collection)
    }
}

impl FromIterator<Feature> for TripCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::from_features(iter.into_iter().collect())
    }
}

fn collect_geometry(geometry: &Geometry, out: &mut Vec<Coord<f64>>) {
    collect_value(&geometry.value, out);
}

fn collect_value(value: &Value, out: &mut Vec<Coord<f64>>) {
    match value {
        Value::Point(position) => out.extend(to_coord(position)),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            out.extend(positions.iter().filter_map(|p| to_coord(p)));
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            out.extend(lines.iter().flatten().filter_map(|p| to_coord(p)));
        }
        Value::MultiPolygon(polygons) => {
            out.extend(
                polygons
                    .iter()
                    .flatten()
                    .flatten()
                    .filter_map(|p| to_coord(p)),
            );
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_geometry(geometry, out);
            }
        }
    }
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    let x = *position.first()?;
    let y = *position.get(1)?;
    (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
}

/// Read a feature property as display text.
///
/// Strings are returned verbatim; numbers and booleans use their JSON text.
/// Absent and `null` properties yield `None`.
#[must_use]
pub fn property_text(feature: &Feature, name: &str) -> Option<String> {
    match feature.properties.as_ref()?.get(name)? {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// The seven displayed fields of one trip feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripDetails {
    /// Vehicle running the trip.
    pub vehicle_ref: String,
    /// Rider-facing line name.
    pub published_line_name: String,
    /// Direction of travel.
    pub direction_ref: String,
    /// First stop.
    pub origin_name: String,
    /// Last stop.
    pub destination_name: String,
    /// Scheduled start.
    pub start_time: String,
    /// Scheduled end.
    pub end_time: String,
}

/// A feature lacked one or more of the displayed properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature is missing properties: {}", missing.join(", "))]
pub struct MissingProperties {
    /// Names of the absent properties, in display order.
    pub missing: Vec<&'static str>,
}

impl TripDetails {
    /// Extract the displayed fields from `feature`.
    ///
    /// # Errors
    /// Returns [`MissingProperties`] naming every absent field.
    pub fn from_feature(feature: &Feature) -> Result<Self, MissingProperties> {
        let mut missing = Vec::new();
        let mut take = |name: &'static str| {
            property_text(feature, name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };
        let details = Self {
            vehicle_ref: take(PROP_VEHICLE_REF),
            published_line_name: take(PROP_PUBLISHED_LINE_NAME),
            direction_ref: take(PROP_DIRECTION_REF),
            origin_name: take(PROP_ORIGIN_NAME),
            destination_name: take(PROP_DESTINATION_NAME),
            start_time: take(PROP_START_TIME),
            end_time: take(PROP_END_TIME),
        };
        if missing.is_empty() {
            Ok(details)
        } else {
            Err(MissingProperties { missing })
        }
    }
}
