//! Coordinate deduplication.
//!
//! Every distinct coordinate maps to exactly one [`Location`]; crimes at the
//! same coordinate accumulate on it in ingestion order.

use std::collections::BTreeMap;

use crime_radar_crime_models::{Coordinate, CoordinateKey, Crime, Location};

/// Map of [`CoordinateKey`] to the [`Location`] at that coordinate.
///
/// Locations are kept in first-seen order. The table is written by a single
/// loader and is read-only once the finder is built.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    by_key: BTreeMap<CoordinateKey, usize>,
    locations: Vec<Location>,
}

impl LocationTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_key: BTreeMap::new(),
            locations: Vec::new(),
        }
    }

    /// Gets the location for `coordinate`, creating an empty one if none
    /// exists yet.
    pub fn get_or_create(&mut self, coordinate: Coordinate) -> &mut Location {
        let next = self.locations.len();
        let idx = *self.by_key.entry(coordinate.key()).or_insert(next);
        if idx == next {
            self.locations.push(Location::new(coordinate));
        }
        &mut self.locations[idx]
    }

    /// Appends `crime` to the location at `coordinate`, creating the
    /// location if needed.
    pub fn record(&mut self, coordinate: Coordinate, crime: Crime) -> &Location {
        let location = self.get_or_create(coordinate);
        location.crimes.push(crime);
        location
    }

    /// Looks up the location with the given key.
    #[must_use]
    pub fn get(&self, key: &CoordinateKey) -> Option<&Location> {
        self.by_key.get(key).map(|&idx| &self.locations[idx])
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the table has no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Total crimes across all locations.
    #[must_use]
    pub fn crime_count(&self) -> usize {
        self.locations.iter().map(|l| l.crimes.len()).sum()
    }

    /// Iterates locations in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }
}

impl<'a> IntoIterator for &'a LocationTable {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
