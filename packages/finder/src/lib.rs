#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Finds recorded crimes near a WGS84 coordinate.
//!
//! # Architecture
//!
//! - **Load time**: raw rows ([`ingest`]) are parsed and folded into a
//!   [`LocationTable`] keyed by [`CoordinateKey`], one [`Location`] per
//!   distinct coordinate. A kd-tree is then built over the unique
//!   coordinates. Both are immutable afterwards.
//! - **Query time**: [`CrimeFinder::find_near`] searches a half-mile box
//!   around the query point, re-keys every hit back through the location
//!   table, and returns a [`SearchResult`].
//! - **Output**: [`encode()`] writes a result as compact JSON without going
//!   through a generic serializer.
//!
//! # Usage
//!
//! ```rust,no_run
//! # fn example() -> Result<(), crime_radar_finder::FinderError> {
//! use crime_radar_finder::{Coordinate, CrimeFinder, CsvOptions, encode};
//!
//! let finder = CrimeFinder::from_csv_path("data/crimes.csv", &CsvOptions::default())?;
//! let nearby = finder.find_near(Coordinate::new(45.5358, -122.6647))?;
//! let body: Vec<u8> = encode(&nearby);
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod csv_source;
pub mod encode;
pub mod finder;
pub mod ingest;
pub mod locations;
pub mod result;

pub use crime_radar_crime_models::{CategorySet, Coordinate, CoordinateKey, Crime, Location};
pub use crime_radar_spatial::{HALF_MILE_DEGREES, SearchRadius};
pub use csv_source::CsvOptions;
pub use encode::{encode, encode_into};
pub use finder::{CrimeFinder, FinderCell};
pub use ingest::RawRow;
pub use locations::LocationTable;
pub use result::SearchResult;

/// Errors from building or querying a [`CrimeFinder`].
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// A latitude or longitude column held text that is not a finite number.
    #[error("Malformed coordinate in row {row}, column {column}: {value:?}")]
    MalformedCoordinate {
        /// Zero-based position of the row in the input.
        row: usize,
        /// Column index of the bad value.
        column: usize,
        /// The offending text.
        value: String,
    },

    /// The identifier column could not be parsed. Never aborts a build;
    /// the row's crime is skipped and the error is logged.
    #[error("Malformed identifier in row {row}: {value:?}")]
    MalformedIdentifier {
        /// Zero-based position of the row in the input.
        row: usize,
        /// The offending text.
        value: String,
    },

    /// A query was made before the finder was built.
    #[error("Crime index has not been built")]
    IndexNotBuilt,

    /// The query point has a non-finite component.
    #[error("Invalid query point ({lat}, {lng})")]
    InvalidQueryPoint {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lng: f64,
    },

    /// Reading the row source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<std::convert::Infallible> for FinderError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
