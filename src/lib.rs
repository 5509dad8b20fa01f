/// climate_service: read-only HTTP API over a fixed climate dataset.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model     — shared data types (Station, PrcpObservation, TobsObservation, …)
/// ├── config    — service configuration loader (climate.toml + env overrides)
/// ├── db        — SQLite dataset open/validation and DatasetError taxonomy
/// ├── queries   — typed read-only queries against station/measurement
/// ├── snapshot  — result sets precomputed once at startup
/// └── endpoint  — HTTP route table and JSON responses
/// ```

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod queries;
pub mod snapshot;
