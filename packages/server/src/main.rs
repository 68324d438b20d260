#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime radar API server.

use std::path::PathBuf;

use clap::Parser;
use crime_radar_finder::{CsvOptions, HALF_MILE_DEGREES, SearchRadius};
use crime_radar_server::{ServerConfig, ServerError, parse_half_width, run_server};

#[derive(Parser)]
#[command(name = "crime_radar_server", about = "Crime radar API server")]
struct Cli {
    /// CSV file of crimes to load
    #[arg(short, long)]
    file: PathBuf,
    /// Port to listen on
    #[arg(short, long, default_value_t = 8081)]
    port: u16,
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
    /// Search box half-width in degrees, applied to both axes
    #[arg(long, default_value_t = HALF_MILE_DEGREES, value_parser = parse_half_width)]
    half_width: f64,
    /// Treat the first CSV row as data instead of a header
    #[arg(long)]
    no_headers: bool,
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let config = ServerConfig {
        bind_addr: cli.bind,
        port: cli.port,
        data_file: cli.file,
        csv: CsvOptions {
            has_headers: !cli.no_headers,
            ..CsvOptions::default()
        },
        radius: SearchRadius::uniform(cli.half_width),
    };

    run_server(config).await
}
