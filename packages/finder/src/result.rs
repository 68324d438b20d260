//! The outcome of a proximity search.

use crime_radar_crime_models::{Coordinate, Crime, Location};

/// Locations found near a query point.
///
/// Borrows its locations from the [`crate::CrimeFinder`] that produced it and
/// is never modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a> {
    query: Coordinate,
    locations: Vec<&'a Location>,
}

impl<'a> SearchResult<'a> {
    /// Creates a result for `query`, which must be finite so the result
    /// encodes as valid JSON.
    #[must_use]
    pub(crate) const fn new(query: Coordinate, locations: Vec<&'a Location>) -> Self {
        Self { query, locations }
    }

    /// The point that was searched around.
    #[must_use]
    pub const fn query(&self) -> Coordinate {
        self.query
    }

    /// Matching locations.
    #[must_use]
    pub fn locations(&self) -> &[&'a Location] {
        &self.locations
    }

    /// Number of matching locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Coordinates of all matching locations.
    #[must_use]
    pub fn points(&self) -> Vec<Coordinate> {
        self.locations.iter().map(|l| l.point).collect()
    }

    /// Every crime at every matching location, location by location.
    #[must_use]
    pub fn crimes(&self) -> Vec<&'a Crime> {
        self.locations.iter().flat_map(|l| l.crimes.iter()).collect()
    }

    /// Total crimes across all matching locations.
    #[must_use]
    pub fn crime_count(&self) -> usize {
        self.locations.iter().map(|l| l.crimes.len()).sum()
    }
}
