#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime radar server.
//!
//! Search results are written by the finder's own encoder; these types cover
//! the remaining endpoints and the query-string form of the search.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Distinct locations loaded.
    pub location_count: usize,
    /// Crimes loaded.
    pub crime_count: usize,
}

/// Query parameters for `GET /api/near`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NearQueryParams {
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lng: f64,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_uses_camel_case() {
        let health = ApiHealth {
            healthy: true,
            version: "0.1.0".to_string(),
            location_count: 224,
            crime_count: 2321,
        };
        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value["locationCount"], 224);
        assert_eq!(value["crimeCount"], 2321);
    }

    #[test]
    fn near_params_parse_from_json() {
        let params: NearQueryParams =
            serde_json::from_str(r#"{"lat":45.5,"lng":-122.6}"#).unwrap();
        assert!((params.lat - 45.5).abs() < f64::EPSILON);
        assert!((params.lng - -122.6).abs() < f64::EPSILON);
    }
}
