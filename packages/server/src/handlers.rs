//! HTTP handler functions for the crime radar API.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use crime_radar_finder::{Coordinate, FinderError, encode};
use crime_radar_server_models::{ApiError, ApiHealth, NearQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        location_count: state.finder.location_count(),
        crime_count: state.finder.crime_count(),
    })
}

/// `GET /api/categories`
///
/// Returns every crime category in the loaded data, in first-seen order.
pub async fn categories(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.finder.categories())
}

/// `GET /crimes/near/{lat}/{lng}`
pub async fn near_path(state: web::Data<AppState>, path: web::Path<(f64, f64)>) -> HttpResponse {
    let (lat, lng) = path.into_inner();
    find_near(&state, Coordinate::new(lat, lng))
}

/// `GET /api/near?lat=..&lng=..`
pub async fn near_query(
    state: web::Data<AppState>,
    params: web::Query<NearQueryParams>,
) -> HttpResponse {
    find_near(&state, Coordinate::new(params.lat, params.lng))
}

/// Runs the search and writes the encoder's bytes as the response body.
fn find_near(state: &AppState, point: Coordinate) -> HttpResponse {
    match state.finder.find_near(point) {
        Ok(result) => HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(encode(&result)),
        Err(e @ FinderError::InvalidQueryPoint { .. }) => {
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
        Err(e) => {
            log::error!("Failed to search near ({}, {}): {e}", point.lat, point.lng);
            HttpResponse::InternalServerError().json(ApiError::new("Failed to search crimes"))
        }
    }
}
