//! Identifier newtypes and the (vehicle, route) query pair.
//!
//! Raw user input is normalised here: surrounding whitespace is trimmed and
//! blank values are treated as absent, so downstream code only ever sees
//! meaningful identifiers.

use std::{fmt, ops::Deref};

/// Identifier of one physical vehicle's current or recent trip.
///
/// # Examples
/// ```
/// # use transit_core::VehicleRef;
/// let vehicle = VehicleRef::parse("  NYCT_2257 ").expect("non-blank input");
/// assert_eq!(vehicle.as_str(), "NYCT_2257");
/// assert!(VehicleRef::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleRef(String);

/// Rider-facing line name identifying a route shared by many vehicles.
///
/// # Examples
/// ```
/// # use transit_core::RouteRef;
/// let route = RouteRef::new("B6");
/// assert_eq!(route.to_string(), "B6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteRef(String);

macro_rules! identifier_impls {
    ($name:ident) => {
        impl $name {
            /// Wrap an identifier verbatim.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Trim raw input, returning `None` when nothing remains.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_owned()))
                }
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner [`String`].
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier_impls!(VehicleRef);
identifier_impls!(RouteRef);

/// The query dimension an identifier belongs to.
///
/// Cache keys carry the dimension so that a vehicle id and a route id that
/// happen to be equal strings never share a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Lookups keyed by vehicle reference.
    Vehicle,
    /// Lookups keyed by route (published line) reference.
    Route,
}

impl Dimension {
    /// Stable tag used in cache keys and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Route => "route",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic cache slot address derived from a dimension and identifier.
///
/// # Examples
/// ```
/// # use transit_core::{CacheKey, Dimension};
/// let key = CacheKey::new(Dimension::Vehicle, "NYCT_2257");
/// assert_eq!(key.as_str(), "vehicle:NYCT_2257");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `id` within `dimension`.
    #[must_use]
    pub fn new(dimension: Dimension, id: &str) -> Self {
        Self(format!("{}:{id}", dimension.as_str()))
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The lookup a query pair resolves to.
///
/// A vehicle always decides the endpoint; a route alongside it only narrows
/// the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Fetch by vehicle, optionally keeping only features on `line`.
    Vehicle {
        /// Vehicle to look up.
        vehicle: &'a VehicleRef,
        /// Optional published line filter.
        line: Option<&'a RouteRef>,
    },
    /// Fetch by route alone.
    Route(&'a RouteRef),
}

/// The user's current (vehicle, route) selection.
///
/// # Examples
/// ```
/// # use transit_core::{IdentifierPair, Lookup};
/// let pair = IdentifierPair::from_input(Some("NYCT_2257"), Some(" "));
/// assert!(pair.route.is_none());
/// assert!(matches!(pair.lookup(), Some(Lookup::Vehicle { line: None, .. })));
/// assert!(IdentifierPair::default().lookup().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IdentifierPair {
    /// Selected vehicle, if any.
    pub vehicle: Option<VehicleRef>,
    /// Selected route, if any.
    pub route: Option<RouteRef>,
}

impl IdentifierPair {
    /// Build a pair from already-normalised identifiers.
    #[must_use]
    pub const fn new(vehicle: Option<VehicleRef>, route: Option<RouteRef>) -> Self {
        Self { vehicle, route }
    }

    /// Pair selecting a vehicle only.
    #[must_use]
    pub const fn vehicle(vehicle: VehicleRef) -> Self {
        Self::new(Some(vehicle), None)
    }

    /// Pair selecting a route only.
    #[must_use]
    pub const fn route(route: RouteRef) -> Self {
        Self::new(None, Some(route))
    }

    /// Build a pair from raw input, trimming values and dropping blanks.
    #[must_use]
    pub fn from_input(vehicle: Option<&str>, route: Option<&str>) -> Self {
        Self {
            vehicle: vehicle.and_then(VehicleRef::parse),
            route: route.and_then(RouteRef::parse),
        }
    }

    /// Interpret a form submission.
    ///
    /// Returns `None` when both inputs are blank: an empty submission leaves
    /// the current selection untouched rather than clearing it.
    #[must_use]
    pub fn from_submission(vehicle: Option<&str>, route: Option<&str>) -> Option<Self> {
        let pair = Self::from_input(vehicle, route);
        if pair.is_empty() { None } else { Some(pair) }
    }

    /// Whether neither identifier carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup().is_none()
    }

    /// Decide which lookup this pair needs, or `None` when it is empty.
    ///
    /// Blank identifiers built with `new` count as absent.
    #[must_use]
    pub fn lookup(&self) -> Option<Lookup<'_>> {
        let vehicle = self.vehicle.as_ref().filter(|id| !id.trim().is_empty());
        let route = self.route.as_ref().filter(|id| !id.trim().is_empty());
        match (vehicle, route) {
            (Some(vehicle), line) => Some(Lookup::Vehicle { vehicle, line }),
            (None, Some(route)) => Some(Lookup::Route(route)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for IdentifierPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.vehicle, &self.route) {
            (Some(vehicle), Some(route)) => {
                write!(f, "VehicleRef \"{vehicle}\" and PublicRef \"{route}\"")
            }
            (Some(vehicle), None) => write!(f, "VehicleRef \"{vehicle}\""),
            (None, Some(route)) => write!(f, "PublicRef \"{route}\""),
            (None, None) => f.write_str("no selection"),
        }
    }
}
