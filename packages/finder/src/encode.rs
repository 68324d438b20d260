//! Hand-written JSON encoder for search results.
//!
//! Produces
//!
//! ```text
//! {"query":{"lat":<f>,"lng":<f>},"locations":[{"point":{"lat":<f>,"lng":<f>},"crimes":[{"id":<i>,"date":"<s>","time":"<s>","type":"<s>"}]}]}
//! ```
//!
//! with no whitespace. Floats use Rust's shortest round-trip formatting, so
//! parsing the output yields bit-identical values. Strings get the minimal
//! JSON escaping: quotes, backslashes and control characters.

use std::fmt::Display;
use std::io::Write as _;

use crime_radar_crime_models::{Coordinate, Crime, Location};

use crate::SearchResult;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encodes `result` as JSON.
#[must_use]
pub fn encode(result: &SearchResult<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(estimate_len(result));
    encode_into(result, &mut out);
    out
}

/// Appends the JSON encoding of `result` to `out`.
pub fn encode_into(result: &SearchResult<'_>, out: &mut Vec<u8>) {
    out.extend_from_slice(b"{\"query\":");
    push_coordinate(out, result.query());
    out.extend_from_slice(b",\"locations\":[");
    for (i, location) in result.locations().iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        push_location(out, location);
    }
    out.extend_from_slice(b"]}");
}

fn estimate_len(result: &SearchResult<'_>) -> usize {
    64 + result.len() * 64 + result.crime_count() * 96
}

fn push_location(out: &mut Vec<u8>, location: &Location) {
    out.extend_from_slice(b"{\"point\":");
    push_coordinate(out, location.point);
    out.extend_from_slice(b",\"crimes\":[");
    for (i, crime) in location.crimes.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        push_crime(out, crime);
    }
    out.extend_from_slice(b"]}");
}

fn push_crime(out: &mut Vec<u8>, crime: &Crime) {
    out.extend_from_slice(b"{\"id\":");
    push_display(out, crime.id);
    out.extend_from_slice(b",\"date\":");
    push_str(out, &crime.date);
    out.extend_from_slice(b",\"time\":");
    push_str(out, &crime.time);
    out.extend_from_slice(b",\"type\":");
    push_str(out, &crime.crime_type);
    out.push(b'}');
}

fn push_coordinate(out: &mut Vec<u8>, coordinate: Coordinate) {
    out.extend_from_slice(b"{\"lat\":");
    push_display(out, coordinate.lat);
    out.extend_from_slice(b",\"lng\":");
    push_display(out, coordinate.lng);
    out.push(b'}');
}

fn push_display(out: &mut Vec<u8>, value: impl Display) {
    // Writing to a Vec<u8> cannot fail.
    let _ = write!(out, "{value}");
}

/// Writes `value` as a quoted JSON string.
fn push_str(out: &mut Vec<u8>, value: &str) {
    out.push(b'"');

    let bytes = value.as_bytes();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let short: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => b"",
            _ => continue,
        };

        out.extend_from_slice(&bytes[start..i]);
        if short.is_empty() {
            out.extend_from_slice(b"\\u00");
            out.push(HEX_DIGITS[usize::from(byte >> 4)]);
            out.push(HEX_DIGITS[usize::from(byte & 0x0f)]);
        } else {
            out.extend_from_slice(short);
        }
        start = i + 1;
    }
    out.extend_from_slice(&bytes[start..]);

    out.push(b'"');
}
