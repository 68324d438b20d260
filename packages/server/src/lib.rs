#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime radar.
//!
//! Loads the crime CSV once at startup, builds a [`CrimeFinder`], and serves
//! proximity searches from it. The finder is immutable, so handlers share it
//! through an [`Arc`] without locking.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, error, middleware, web};
use crime_radar_finder::{CrimeFinder, CsvOptions, FinderError, SearchRadius};

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Loading the crime data failed.
    #[error("Failed to load crime data: {0}")]
    Finder(#[from] FinderError),

    /// Binding or running the HTTP server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server settings, usually parsed from the command line.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// CSV file of crimes to load.
    pub data_file: PathBuf,
    /// Layout of the CSV file.
    pub csv: CsvOptions,
    /// Search box half-widths.
    pub radius: SearchRadius,
}

/// Shared application state.
pub struct AppState {
    /// The loaded crime finder.
    pub finder: Arc<CrimeFinder>,
}

/// Loads the configured CSV file into a finder.
///
/// # Errors
///
/// Returns [`ServerError::Finder`] if the file cannot be read or contains a
/// malformed coordinate.
pub fn load_finder(config: &ServerConfig) -> Result<CrimeFinder, ServerError> {
    let finder = CrimeFinder::from_csv_path(&config.data_file, &config.csv)?;
    Ok(finder.with_radius(config.radius))
}

/// Registers the API routes.
///
/// Path segments that fail to parse answer `400 Bad Request`, the same as
/// malformed query strings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default().error_handler(|e, _| error::ErrorBadRequest(e)),
    )
    .route(
        "/crimes/near/{lat}/{lng}",
        web::get().to(handlers::near_path),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/near", web::get().to(handlers::near_query)),
    );
}

/// Parses a search half-width in degrees, rejecting negative and
/// non-finite values.
///
/// # Errors
///
/// Returns a message suitable for command-line output if `s` is not a
/// finite, non-negative number.
pub fn parse_half_width(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{s:?} must be a finite, non-negative number of degrees"))
    }
}

/// Starts the crime radar API server.
///
/// Builds the finder from `config.data_file` before binding, so a bad data
/// file stops startup instead of surfacing on the first request. This is a
/// regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Finder`] if the data cannot be loaded, or
/// [`ServerError::Io`] if the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let finder = load_finder(&config)?;
    let state = web::Data::new(AppState {
        finder: Arc::new(finder),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
