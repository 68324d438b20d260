#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Coordinate, crime, and location types shared across the crime radar.
//!
//! A [`Location`] is one distinct WGS84 coordinate together with every
//! [`Crime`] recorded there. Locations are identified by their
//! [`CoordinateKey`], which is the only way a coordinate is ever turned into a
//! lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate from a latitude/longitude pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Returns the canonical dedup/lookup key for this coordinate.
    #[must_use]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(*self)
    }

    /// Returns the coordinate as a `[lat, lng]` array, the layout used by the
    /// spatial index.
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// Canonical key for a [`Coordinate`].
///
/// Built from the IEEE-754 bit patterns of the latitude and longitude with
/// `-0.0` folded into `0.0`. Two coordinates share a key exactly when they
/// compare equal, so the key never depends on how a float is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoordinateKey {
    lat_bits: u64,
    lng_bits: u64,
}

impl CoordinateKey {
    /// Latitude this key was derived from.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        f64::from_bits(self.lat_bits)
    }

    /// Longitude this key was derived from.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        f64::from_bits(self.lng_bits)
    }
}

/// Folds negative zero into positive zero so both map to one key.
const fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

impl From<Coordinate> for CoordinateKey {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            lat_bits: canonical_bits(coordinate.lat),
            lng_bits: canonical_bits(coordinate.lng),
        }
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat(), self.lng())
    }
}

/// A single crime from the source data (one row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crime {
    /// Case identifier.
    pub id: i64,
    /// Date the crime was reported, as it appears in the source.
    pub date: String,
    /// Time the crime was reported, as it appears in the source.
    pub time: String,
    /// Offense category, e.g. `"Liquor Laws"`.
    #[serde(rename = "type")]
    pub crime_type: String,
}

impl fmt::Display for Crime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.id, self.date, self.time, self.crime_type
        )
    }
}

/// A distinct coordinate and every crime recorded at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Where the crimes occurred.
    pub point: Coordinate,
    /// Crimes in ingestion order.
    pub crimes: Vec<Crime>,
}

impl Location {
    /// Creates a location with no crimes.
    #[must_use]
    pub const fn new(point: Coordinate) -> Self {
        Self {
            point,
            crimes: Vec::new(),
        }
    }

    /// The canonical key of this location's coordinate.
    #[must_use]
    pub fn key(&self) -> CoordinateKey {
        self.point.key()
    }
}

/// The distinct crime categories seen during ingestion, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySet {
    categories: Vec<String>,
}

impl CategorySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Whether `category` has been seen.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Records `category` if it is new. Returns `true` when it was added.
    pub fn insert(&mut self, category: &str) -> bool {
        if self.contains(category) {
            return false;
        }
        self.categories.push(category.to_owned());
        true
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no categories have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates categories in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Categories as a slice, in first-seen order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.categories
    }
}
