//! Row parsing for the crime CSV layout.
//!
//! Rows follow the city's export: `id, date, time, category, ...` with the
//! latitude and longitude in columns 8 and 9. Anything past column 9 is
//! ignored.

use crime_radar_crime_models::{Coordinate, Crime};

use crate::FinderError;

/// Column holding the case identifier.
pub const ID_COLUMN: usize = 0;
/// Column holding the report date.
pub const DATE_COLUMN: usize = 1;
/// Column holding the report time.
pub const TIME_COLUMN: usize = 2;
/// Column holding the offense category.
pub const CATEGORY_COLUMN: usize = 3;
/// Column holding the latitude.
pub const LAT_COLUMN: usize = 8;
/// Column holding the longitude.
pub const LNG_COLUMN: usize = 9;

/// A row of raw text columns.
pub trait RawRow {
    /// Returns the text of column `index`, or `None` if the row is shorter.
    fn column(&self, index: usize) -> Option<&str>;
}

impl<S: AsRef<str>> RawRow for [S] {
    fn column(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> RawRow for Vec<S> {
    fn column(&self, index: usize) -> Option<&str> {
        self.as_slice().column(index)
    }
}

impl<S: AsRef<str>, const N: usize> RawRow for [S; N] {
    fn column(&self, index: usize) -> Option<&str> {
        self.as_slice().column(index)
    }
}

impl RawRow for csv::StringRecord {
    fn column(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

impl<T: RawRow + ?Sized> RawRow for &T {
    fn column(&self, index: usize) -> Option<&str> {
        (**self).column(index)
    }
}

/// A row whose coordinates parsed successfully.
#[derive(Debug)]
pub struct ParsedRow {
    /// Where the crime occurred.
    pub coordinate: Coordinate,
    /// The crime itself, or [`FinderError::MalformedIdentifier`] when the
    /// identifier column could not be parsed.
    pub crime: Result<Crime, FinderError>,
}

/// Parses one row.
///
/// Returns `Ok(None)` when either coordinate column is empty or missing;
/// such rows are not errors, the source simply has no location for them.
///
/// # Errors
///
/// Returns [`FinderError::MalformedCoordinate`] if a coordinate column is
/// non-empty but not a finite floating-point number.
pub fn parse_row<R: RawRow + ?Sized>(
    row: &R,
    position: usize,
) -> Result<Option<ParsedRow>, FinderError> {
    let (Some(lat), Some(lng)) = (
        coordinate_text(row, LAT_COLUMN),
        coordinate_text(row, LNG_COLUMN),
    ) else {
        return Ok(None);
    };

    let coordinate = Coordinate::new(
        parse_coordinate(lat, position, LAT_COLUMN)?,
        parse_coordinate(lng, position, LNG_COLUMN)?,
    );

    let id_text = row.column(ID_COLUMN).unwrap_or_default();
    let crime = parse_identifier(id_text)
        .map(|id| Crime {
            id,
            date: row.column(DATE_COLUMN).unwrap_or_default().to_owned(),
            time: row.column(TIME_COLUMN).unwrap_or_default().to_owned(),
            crime_type: row.column(CATEGORY_COLUMN).unwrap_or_default().to_owned(),
        })
        .ok_or_else(|| FinderError::MalformedIdentifier {
            row: position,
            value: id_text.to_owned(),
        });

    Ok(Some(ParsedRow { coordinate, crime }))
}

/// Trimmed coordinate text, or `None` if the column is blank or absent.
fn coordinate_text<R: RawRow + ?Sized>(row: &R, column: usize) -> Option<&str> {
    row.column(column)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn parse_coordinate(text: &str, row: usize, column: usize) -> Result<f64, FinderError> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FinderError::MalformedCoordinate {
            row,
            column,
            value: text.to_owned(),
        })
}

/// Parses a case identifier, ignoring surrounding whitespace.
///
/// Accepts an optional sign followed by decimal digits or a `0x`, `0o` or
/// `0b` radix prefix. A leading zero without a prefix is still decimal.
#[must_use]
pub fn parse_identifier(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        0_i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}
