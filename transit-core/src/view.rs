//! Map framing for a resolved trip collection.

use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::trip::TripCollection;

/// Default map centre (longitude, latitude): Jamaica, Queens.
pub const DEFAULT_CENTER: Coord<f64> = Coord {
    x: -73.809_474,
    y: 40.705_808,
};

/// Default zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// Where a renderer should point the map.
///
/// # Examples
/// ```
/// # use transit_core::{MapView, TripCollection, view::DEFAULT_CENTER};
/// let view = MapView::fit(&TripCollection::from_features(Vec::new()));
/// assert_eq!(view.center, DEFAULT_CENTER);
/// assert!(view.bounds.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MapView {
    /// Centre point, `x` is longitude and `y` latitude.
    pub center: Coord<f64>,
    /// Zoom level.
    pub zoom: u8,
    /// Extent of the displayed features, when any have geometry.
    pub bounds: Option<Rect<f64>>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            bounds: None,
        }
    }
}

impl MapView {
    /// Frame `collection`, falling back to the default view.
    #[must_use]
    pub fn fit(collection: &TripCollection) -> Self {
        collection
            .bounds()
            .map_or_else(Self::default, |rect| Self {
                center: rect.center(),
                zoom: DEFAULT_ZOOM,
                bounds: Some(rect),
            })
    }
}
