//! Loading a [`CrimeFinder`] from CSV.

use std::io::Read;
use std::path::Path;

use crate::{CrimeFinder, FinderError};

/// How the CSV source is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether the first line is a header row to skip.
    pub has_headers: bool,
    /// Field delimiter (default: comma).
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
        }
    }
}

impl CsvOptions {
    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            // Rows with trailing commas or missing trailing columns are
            // common in the exports.
            .flexible(true);
        builder
    }
}

impl CrimeFinder {
    /// Reads the CSV file at `path` and builds a finder from its rows.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Csv`] if the file cannot be opened or decoded,
    /// or [`FinderError::MalformedCoordinate`] if a row has a bad coordinate.
    pub fn from_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self, FinderError> {
        let path = path.as_ref();
        log::info!("Loading crimes from {}", path.display());

        let reader = options.reader_builder().from_path(path)?;
        Self::try_build(reader.into_records())
    }

    /// Builds a finder from CSV data read from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Csv`] if the data cannot be decoded, or
    /// [`FinderError::MalformedCoordinate`] if a row has a bad coordinate.
    pub fn from_csv_reader<R: Read>(source: R, options: &CsvOptions) -> Result<Self, FinderError> {
        let reader = options.reader_builder().from_reader(source);
        Self::try_build(reader.into_records())
    }
}

#[cfg(test)]
mod tests {
    use crime_radar_crime_models::Coordinate;

    use super::*;

    const HEADER: &str = "id,date,time,category,address,neighborhood,precinct,district,lat,lng\n";

    #[test]
    fn skips_header_row_by_default() {
        let data = format!(
            "{HEADER}13690824,05/27/2011,08:35:00,Liquor Laws,\"NE SCHUYLER ST and NE 1ST AVE, PORTLAND, OR 97212\",ELIOT,PORTLAND PREC NO,590,45.53579735412487,-122.66468312170824\n"
        );
        let finder = CrimeFinder::from_csv_reader(data.as_bytes(), &CsvOptions::default()).unwrap();

        assert_eq!(finder.location_count(), 1);
        assert_eq!(finder.crime_count(), 1);
        assert_eq!(finder.categories().as_slice(), ["Liquor Laws"]);
    }

    #[test]
    fn header_row_is_malformed_without_header_option() {
        let options = CsvOptions {
            has_headers: false,
            ..CsvOptions::default()
        };
        let err = CrimeFinder::from_csv_reader(HEADER.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, FinderError::MalformedCoordinate { row: 0, .. }));
    }

    #[test]
    fn accepts_ragged_rows() {
        let data = format!(
            "{HEADER}1,01/01/2012,01:00:00,Arson,,,,,45.5,-122.6,\n2,01/02/2012,02:00:00,Arson\n3,01/03/2012,03:00:00,Vandalism,,,,,45.5,-122.6\n"
        );
        let finder = CrimeFinder::from_csv_reader(data.as_bytes(), &CsvOptions::default()).unwrap();

        assert_eq!(finder.location_count(), 1);
        assert_eq!(finder.crime_count(), 2);
        let nearby = finder.find_near(Coordinate::new(45.5, -122.6)).unwrap();
        assert_eq!(nearby.crime_count(), 2);
    }

    #[test]
    fn reads_tab_delimited_data() {
        let options = CsvOptions {
            has_headers: false,
            delimiter: b'\t',
        };
        let data = "9\t03/01/2012\t12:00:00\tFraud\t\t\t\t\t45.52\t-122.68\n";
        let finder = CrimeFinder::from_csv_reader(data.as_bytes(), &options).unwrap();
        assert_eq!(finder.crime_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = CrimeFinder::from_csv_path("does/not/exist.csv", &CsvOptions::default())
            .unwrap_err();
        assert!(matches!(err, FinderError::Csv(_)));
    }
}
