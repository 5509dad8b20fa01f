//! Climate Observations API - Main Entry Point
//!
//! A read-only HTTP API over a fixed climate dataset (station metadata and
//! daily measurements held in an embedded SQLite file). At startup the
//! service:
//! 1. Loads configuration (climate.toml, .env overrides, CLI flags)
//! 2. Opens the dataset read-only and verifies the expected tables
//! 3. Precomputes the three cached views (precipitation, stations, tobs)
//! 4. Serves five GET routes until the process is terminated
//!
//! Usage:
//!   cargo run --release                       # Defaults from climate.toml
//!   cargo run --release -- --bind 0.0.0.0:80  # Override listener address
//!
//! Environment:
//!   CLIMATE_DB_PATH - path to the SQLite dataset file
//!   CLIMATE_BIND    - listener address override

use climate_service::config;
use climate_service::db;
use climate_service::endpoint::{self, ApiContext};
use climate_service::snapshot::Snapshot;
use std::env;
use std::path::PathBuf;

fn main() {
    println!("🌺 Climate Observations API");
    println!("===========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut bind_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                if i + 1 < args.len() {
                    bind_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address (e.g. 0.0.0.0:8080)");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--bind ADDR]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load configuration
    let mut config = config::load_config();
    if let Some(bind) = bind_override {
        config.server.bind = bind;
    }
    let db_path = PathBuf::from(&config.database.path);

    // Open the dataset and precompute the cached views
    println!("📊 Opening dataset: {}", db_path.display());
    let conn = match db::open_dataset(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("\n❌ Dataset validation failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Dataset validated\n");

    println!("📋 Precomputing cached views...");
    let snapshot = match Snapshot::build(&conn) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("\n❌ Startup precomputation failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!(
        "✓ Cached {} precipitation rows, {} stations, {} temperature rows (station {})\n",
        snapshot.precipitation.len(),
        snapshot.stations.len(),
        snapshot.temperature.len(),
        snapshot.most_active_station
    );

    // The startup connection is done; live routes open their own
    drop(conn);

    let ctx = ApiContext { db_path, snapshot };

    if let Err(e) = endpoint::start_server(&config.server.bind, ctx) {
        eprintln!("\n❌ Server error: {}\n", e);
        std::process::exit(1);
    }
}
