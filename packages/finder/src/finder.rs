//! The crime finder: load once, then answer proximity queries.

use std::convert::Infallible;

use crime_radar_crime_models::{CategorySet, Coordinate};
use crime_radar_spatial::{BoundingBox, KdTree, SearchRadius};
use once_cell::sync::OnceCell;

use crate::ingest::{RawRow, parse_row};
use crate::locations::LocationTable;
use crate::{FinderError, SearchResult};

/// Finds crimes near a WGS84 coordinate.
///
/// Built once from a batch of rows and immutable afterwards, so a shared
/// reference can serve any number of concurrent queries without locking.
#[derive(Debug, Clone)]
pub struct CrimeFinder {
    locations: LocationTable,
    categories: CategorySet,
    tree: KdTree,
    radius: SearchRadius,
}

impl CrimeFinder {
    /// Builds a finder from in-memory rows.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::MalformedCoordinate`] if any row has a
    /// non-empty coordinate that does not parse. Nothing is built in that
    /// case.
    pub fn build<I>(rows: I) -> Result<Self, FinderError>
    where
        I: IntoIterator,
        I::Item: RawRow,
    {
        Self::try_build(rows.into_iter().map(Ok::<_, Infallible>))
    }

    /// Builds a finder from a fallible row source such as a CSV reader.
    ///
    /// Rows with an empty coordinate are dropped. Rows with a malformed
    /// identifier still register their location but contribute no crime, so
    /// search results may contain locations with an empty crime list.
    ///
    /// # Errors
    ///
    /// Returns the first read error from `rows`, or
    /// [`FinderError::MalformedCoordinate`] for the first row with a bad
    /// coordinate.
    pub fn try_build<I, R, E>(rows: I) -> Result<Self, FinderError>
    where
        I: IntoIterator<Item = Result<R, E>>,
        R: RawRow,
        E: Into<FinderError>,
    {
        let mut locations = LocationTable::new();
        let mut categories = CategorySet::new();
        let mut dropped = 0_usize;
        let mut skipped = 0_usize;

        for (position, row) in rows.into_iter().enumerate() {
            let row = row.map_err(Into::<FinderError>::into)?;

            let Some(parsed) = parse_row(&row, position)? else {
                log::debug!("Dropping row {position}: no coordinates");
                dropped += 1;
                continue;
            };

            match parsed.crime {
                Ok(crime) => {
                    categories.insert(&crime.crime_type);
                    locations.record(parsed.coordinate, crime);
                }
                Err(e) => {
                    log::warn!("{e}; skipping crime");
                    locations.get_or_create(parsed.coordinate);
                    skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded {} crimes and {} locations ({dropped} rows without coordinates, {skipped} with bad ids)",
            locations.crime_count(),
            locations.len()
        );

        Ok(Self::from_table(locations, categories))
    }

    /// Builds the spatial index over an already-populated location table.
    #[must_use]
    pub fn from_table(locations: LocationTable, categories: CategorySet) -> Self {
        let tree = KdTree::build(locations.iter().map(|l| l.point.to_array()));
        Self {
            locations,
            categories,
            tree,
            radius: SearchRadius::HALF_MILE,
        }
    }

    /// Replaces the default half-mile search radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: SearchRadius) -> Self {
        self.radius = radius;
        self
    }

    /// The radius used by [`Self::find_near`].
    #[must_use]
    pub const fn radius(&self) -> SearchRadius {
        self.radius
    }

    /// Returns every location within the finder's radius of `point`.
    ///
    /// Result order follows the kd-tree traversal and carries no meaning.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidQueryPoint`] if `point` is not finite.
    pub fn find_near(&self, point: Coordinate) -> Result<SearchResult<'_>, FinderError> {
        self.find_within(point, self.radius)
    }

    /// Returns every location inside the box of half-widths `radius` around
    /// `point`, edges included.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidQueryPoint`] if `point` is not finite.
    pub fn find_within(
        &self,
        point: Coordinate,
        radius: SearchRadius,
    ) -> Result<SearchResult<'_>, FinderError> {
        if !point.is_finite() {
            return Err(FinderError::InvalidQueryPoint {
                lat: point.lat,
                lng: point.lng,
            });
        }

        let bbox = BoundingBox::around(point.to_array(), radius);
        let mut nearby = Vec::new();
        self.tree.for_each_in(&bbox, |entry| {
            // A point without a table entry is skipped rather than failing
            // the query.
            if let Some(location) = self.locations.get(&Coordinate::from(entry.point).key()) {
                nearby.push(location);
            }
        });

        Ok(SearchResult::new(point, nearby))
    }

    /// Returns every location, in the order first seen during loading.
    #[must_use]
    pub fn all(&self) -> SearchResult<'_> {
        SearchResult::new(Coordinate::default(), self.locations.iter().collect())
    }

    /// The distinct crime categories, in first-seen order.
    #[must_use]
    pub const fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// The dedup table backing this finder.
    #[must_use]
    pub const fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Number of crimes across all locations.
    #[must_use]
    pub fn crime_count(&self) -> usize {
        self.locations.crime_count()
    }
}

/// A [`CrimeFinder`] that is built on first use.
///
/// Concurrent callers of [`Self::get_or_try_build`] block until a single
/// build finishes; none of them can observe a partially built finder. A
/// failed build leaves the cell empty so a later call may try again.
#[derive(Debug, Default)]
pub struct FinderCell {
    cell: OnceCell<CrimeFinder>,
}

impl FinderCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the finder, running `build` first if the cell is empty.
    ///
    /// # Errors
    ///
    /// Returns whatever `build` returns when it fails.
    pub fn get_or_try_build<F>(&self, build: F) -> Result<&CrimeFinder, FinderError>
    where
        F: FnOnce() -> Result<CrimeFinder, FinderError>,
    {
        self.cell.get_or_try_init(build)
    }

    /// Returns the finder if it has been built.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::IndexNotBuilt`] if no build has completed.
    pub fn get(&self) -> Result<&CrimeFinder, FinderError> {
        self.cell.get().ok_or(FinderError::IndexNotBuilt)
    }

    /// Whether a build has completed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Queries the finder.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::IndexNotBuilt`] before the first successful
    /// build, otherwise as [`CrimeFinder::find_near`].
    pub fn find_near(&self, point: Coordinate) -> Result<SearchResult<'_>, FinderError> {
        self.get()?.find_near(point)
    }
}

impl From<CrimeFinder> for FinderCell {
    fn from(finder: CrimeFinder) -> Self {
        Self {
            cell: OnceCell::with_value(finder),
        }
    }
}
