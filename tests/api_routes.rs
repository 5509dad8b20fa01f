/// Integration tests for the HTTP route layer
///
/// Each test provisions a fixture SQLite dataset in a temporary directory,
/// boots the real listener on an ephemeral port, and drives it over HTTP.
/// The fixture mirrors the documented round-trip case: stations S1/S2 with
/// measurements S1: 2017-08-20/78, 2017-08-21/80; S2: 2017-08-20/82, plus
/// an out-of-window row and a null precipitation value.
///
/// Run with: cargo test --test api_routes

use climate_service::endpoint::{self, ApiContext};
use climate_service::snapshot::Snapshot;
use rusqlite::Connection;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fixture_dataset(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("climate.sqlite");
    let conn = Connection::open(&path).expect("Failed to create fixture dataset");
    conn.execute_batch(
        "CREATE TABLE station (station TEXT, name TEXT, latitude REAL, longitude REAL, elevation REAL);
         CREATE TABLE measurement (station TEXT, date TEXT, prcp REAL, tobs REAL);

         INSERT INTO station VALUES ('S1', 'Waihee', 21.45, -157.85, 32.9);
         INSERT INTO station VALUES ('S2', 'Kaneohe', 21.42, -157.80, 14.6);

         INSERT INTO measurement VALUES ('S1', '2015-01-01', 0.10, 70.0);
         INSERT INTO measurement VALUES ('S1', '2017-08-20', 0.50, 78.0);
         INSERT INTO measurement VALUES ('S1', '2017-08-21', NULL, 80.0);
         INSERT INTO measurement VALUES ('S2', '2017-08-20', 1.20, 82.0);",
    )
    .expect("Failed to populate fixture dataset");
    path
}

/// Build the snapshot and start the listener on an ephemeral port.
/// Returns the base URL to request against.
fn start_test_server(db_path: &Path) -> String {
    let conn = climate_service::db::open_dataset(db_path).expect("Fixture should validate");
    let snapshot = Snapshot::build(&conn).expect("Fixture snapshot should build");
    drop(conn);

    let ctx = ApiContext {
        db_path: db_path.to_path_buf(),
        snapshot,
    };

    let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to bind test server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("Test server should bind a TCP address")
        .port();

    std::thread::spawn(move || endpoint::serve(&server, &ctx));

    format!("http://127.0.0.1:{}", port)
}

fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let response = reqwest::blocking::get(url).expect("Request should succeed");
    let status = response.status();
    let body = response.json().expect("Response should be JSON");
    (status, body)
}

// ---------------------------------------------------------------------------
// Root Route
// ---------------------------------------------------------------------------

#[test]
fn home_lists_every_route() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let response = reqwest::blocking::get(format!("{}/", base)).unwrap();
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/html"),
        "Root route serves HTML, got {}",
        content_type
    );

    let body = response.text().unwrap();
    for route in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/&lt;start&gt;",
        "/api/v1.0/&lt;start&gt;/&lt;end&gt;",
    ] {
        assert!(body.contains(route), "Route listing should mention {}", route);
    }
}

// ---------------------------------------------------------------------------
// Cached Routes
// ---------------------------------------------------------------------------

#[test]
fn precipitation_serves_trailing_year_newest_first() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/precipitation", base));
    assert_eq!(status, 200);

    let rows = body.as_array().expect("Precipitation should be a JSON array");
    // Window [2016-08-21, 2017-08-21] excludes the 2015 row
    assert_eq!(rows.len(), 3);

    let dates: Vec<&str> = rows.iter().map(|r| r["date"].as_str().unwrap()).collect();
    for pair in dates.windows(2) {
        assert!(pair[0] >= pair[1], "Dates must be newest first: {:?}", dates);
    }
    assert!(!dates.contains(&"2015-01-01"));

    // The null gauge reading is preserved, not coerced to zero
    let latest = rows.iter().find(|r| r["date"] == "2017-08-21").unwrap();
    assert!(latest["prcp"].is_null());
}

#[test]
fn stations_serves_full_directory() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/stations", base));
    assert_eq!(status, 200);

    let rows = body.as_array().expect("Stations should be a JSON array");
    assert_eq!(rows.len(), 2);

    let mut ids: Vec<&str> = rows.iter().map(|r| r["station"].as_str().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec!["S1", "S2"]);

    for row in rows {
        for field in ["station", "name", "latitude", "longitude", "elevation"] {
            assert!(
                !row[field].is_null(),
                "Station entry should populate '{}': {}",
                field,
                row
            );
        }
    }
}

#[test]
fn tobs_serves_most_active_station_ascending() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/tobs", base));
    assert_eq!(status, 200);

    // S1 has 3 measurement rows to S2's 1, so the series is S1's
    // trailing year: 2017-08-20 and 2017-08-21, oldest first.
    let rows = body.as_array().expect("Tobs should be a JSON array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2017-08-20");
    assert_eq!(rows[0]["tobs"], 78.0);
    assert_eq!(rows[1]["date"], "2017-08-21");
    assert_eq!(rows[1]["tobs"], 80.0);
}

// ---------------------------------------------------------------------------
// Live Summary Routes
// ---------------------------------------------------------------------------

#[test]
fn closed_range_summary_round_trips_fixture() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/2017-08-20/2017-08-21", base));
    assert_eq!(status, 200);

    assert_eq!(body["TMIN"], 78.0);
    assert_eq!(body["TMAX"], 82.0);
    assert_eq!(body["TAVG"], 80.0);
}

#[test]
fn open_ended_summary_covers_everything_after_start() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/2017-08-21", base));
    assert_eq!(status, 200);

    // Only S1's 2017-08-21 reading (80.0) is on or after the start date
    assert_eq!(body["TMIN"], 80.0);
    assert_eq!(body["TMAX"], 80.0);
    assert_eq!(body["TAVG"], 80.0);
}

#[test]
fn unmatched_range_returns_nulls_not_an_error() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v1.0/2030-01-01/2030-12-31", base));
    assert_eq!(status, 200);

    assert!(body["TMIN"].is_null());
    assert!(body["TMAX"].is_null());
    assert!(body["TAVG"].is_null());
}

#[test]
fn malformed_date_behaves_like_unmatched_range() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    // Date segments pass through to the text comparison unvalidated
    let (status, body) = get_json(&format!("{}/api/v1.0/not-a-date", base));
    assert_eq!(status, 200);
    assert!(body["TMIN"].is_null());
}

// ---------------------------------------------------------------------------
// Unknown Routes
// ---------------------------------------------------------------------------

#[test]
fn unknown_path_returns_404_with_route_listing() {
    let dir = TempDir::new().unwrap();
    let base = start_test_server(&fixture_dataset(&dir));

    let (status, body) = get_json(&format!("{}/api/v2.0/stations", base));
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not found");
    assert!(body["available_routes"].is_array());
}
