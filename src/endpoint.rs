/// HTTP route layer for the climate observations API
///
/// Binds five GET routes to either a precomputed snapshot view or a live
/// parameterized query, serializing results as JSON:
/// - GET /                          - help text listing the routes
/// - GET /api/v1.0/precipitation    - cached trailing-year precipitation
/// - GET /api/v1.0/stations         - cached station directory
/// - GET /api/v1.0/tobs             - cached temperatures, most-active station
/// - GET /api/v1.0/{start}[/{end}]  - live min/max/avg temperature query

use serde::Serialize;
use std::path::PathBuf;

use crate::db::{self, DatasetError};
use crate::model::TemperatureSummary;
use crate::queries;
use crate::snapshot::Snapshot;

const API_PREFIX: &str = "/api/v1.0/";

// ---------------------------------------------------------------------------
// Request Context
// ---------------------------------------------------------------------------

/// Everything a request handler needs: the immutable startup snapshot and
/// the dataset path for per-request live queries. Built once before the
/// listener starts; never mutated afterwards.
pub struct ApiContext {
    pub db_path: PathBuf,
    pub snapshot: Snapshot,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// The route table. Fixed paths win over the dynamic date segments, same
/// precedence the route listing documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Precipitation,
    Stations,
    Tobs,
    /// `/api/v1.0/{start}` - open-ended summary from a start date.
    SummaryFrom(String),
    /// `/api/v1.0/{start}/{end}` - summary over a closed range.
    SummaryRange(String, String),
    NotFound,
}

impl Route {
    /// Resolve a request path to a route. Date segments pass through
    /// unvalidated; the storage layer compares them as text, so a
    /// malformed date simply matches no rows.
    pub fn parse(url: &str) -> Route {
        // tiny_http hands us the raw request target; the API takes no
        // query parameters, so anything after '?' is ignored.
        let path = url.split('?').next().unwrap_or(url);

        match path {
            "/" => Route::Home,
            "/api/v1.0/precipitation" => Route::Precipitation,
            "/api/v1.0/stations" => Route::Stations,
            "/api/v1.0/tobs" => Route::Tobs,
            _ => {
                let Some(rest) = path.strip_prefix(API_PREFIX) else {
                    return Route::NotFound;
                };
                let segments: Vec<&str> = rest.split('/').collect();
                match segments.as_slice() {
                    [start] if !start.is_empty() => Route::SummaryFrom(start.to_string()),
                    [start, end] if !start.is_empty() && !end.is_empty() => {
                        Route::SummaryRange(start.to_string(), end.to_string())
                    }
                    _ => Route::NotFound,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Bind the listener and serve requests until the process exits.
pub fn start_server(bind: &str, ctx: ApiContext) -> Result<(), String> {
    let server = tiny_http::Server::http(bind)
        .map_err(|e| format!("Failed to start HTTP server on {}: {}", bind, e))?;

    println!("📡 Climate API listening on http://{}", bind);
    println!("   GET /api/v1.0/precipitation - trailing-year precipitation");
    println!("   GET /api/v1.0/stations - station directory");
    println!("   GET /api/v1.0/tobs - trailing-year temperatures, most-active station");
    println!("   GET /api/v1.0/{{start}}[/{{end}}] - temperature summary\n");

    serve(&server, &ctx);
    Ok(())
}

/// The accept loop, separated from binding so tests can run it against an
/// ephemeral port.
pub fn serve(server: &tiny_http::Server, ctx: &ApiContext) {
    for request in server.incoming_requests() {
        let response = handle(ctx, request.url());

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }
}

type HttpResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

/// Dispatch one request to its handler.
fn handle(ctx: &ApiContext, url: &str) -> HttpResponse {
    match Route::parse(url) {
        Route::Home => handle_home(),
        Route::Precipitation => json_response(200, &ctx.snapshot.precipitation),
        Route::Stations => json_response(200, &ctx.snapshot.stations),
        Route::Tobs => json_response(200, &ctx.snapshot.temperature),
        Route::SummaryFrom(start) => handle_summary(ctx, &start, None),
        Route::SummaryRange(start, end) => handle_summary(ctx, &start, Some(&end)),
        Route::NotFound => json_response(
            404,
            &serde_json::json!({
                "error": "Not found",
                "available_routes": [
                    "/",
                    "/api/v1.0/precipitation",
                    "/api/v1.0/stations",
                    "/api/v1.0/tobs",
                    "/api/v1.0/{start}",
                    "/api/v1.0/{start}/{end}",
                ]
            }),
        ),
    }
}

/// Handle the root route: static help text listing the routes.
fn handle_home() -> HttpResponse {
    println!("Server received request for 'Home' page...");

    let body = "Welcome to the Climate App API!<br/>\
                Available Routes:<br/>\
                /api/v1.0/precipitation<br/>\
                /api/v1.0/stations<br/>\
                /api/v1.0/tobs<br/>\
                /api/v1.0/&lt;start&gt;<br/>\
                /api/v1.0/&lt;start&gt;/&lt;end&gt;";

    tiny_http::Response::from_string(body)
        .with_status_code(tiny_http::StatusCode::from(200))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .unwrap(),
        )
}

/// Handle the two live summary routes. Each request opens its own
/// short-lived read-only connection, which closes on every exit path
/// when it drops.
fn handle_summary(ctx: &ApiContext, start: &str, end: Option<&str>) -> HttpResponse {
    let result: Result<TemperatureSummary, DatasetError> = db::open_read_only(&ctx.db_path)
        .and_then(|conn| queries::temperature_summary(&conn, start, end));

    match result {
        Ok(summary) => json_response(200, &summary),
        Err(e) => {
            // Detail stays server-side; the client gets a generic body.
            eprintln!("✗ Temperature summary query failed: {}", e);
            json_response(500, &serde_json::json!({ "error": "internal server error" }))
        }
    }
}

/// Create an HTTP response with a JSON body.
fn json_response<T: Serialize>(status_code: u16, body: &T) -> HttpResponse {
    let body = serde_json::to_string(body).unwrap();

    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_routes_resolve_exactly() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/api/v1.0/precipitation"), Route::Precipitation);
        assert_eq!(Route::parse("/api/v1.0/stations"), Route::Stations);
        assert_eq!(Route::parse("/api/v1.0/tobs"), Route::Tobs);
    }

    #[test]
    fn single_segment_becomes_open_ended_summary() {
        assert_eq!(
            Route::parse("/api/v1.0/2017-08-20"),
            Route::SummaryFrom("2017-08-20".to_string())
        );
    }

    #[test]
    fn two_segments_become_closed_range_summary() {
        assert_eq!(
            Route::parse("/api/v1.0/2017-08-20/2017-08-21"),
            Route::SummaryRange("2017-08-20".to_string(), "2017-08-21".to_string())
        );
    }

    #[test]
    fn malformed_dates_still_route_to_summary() {
        // No validation on date segments; the storage layer handles them
        assert_eq!(
            Route::parse("/api/v1.0/not-a-date"),
            Route::SummaryFrom("not-a-date".to_string())
        );
    }

    #[test]
    fn query_strings_are_ignored() {
        assert_eq!(
            Route::parse("/api/v1.0/stations?verbose=1"),
            Route::Stations
        );
        assert_eq!(Route::parse("/?x=1"), Route::Home);
    }

    #[test]
    fn unmatched_paths_are_not_found() {
        assert_eq!(Route::parse("/api"), Route::NotFound);
        assert_eq!(Route::parse("/api/v1.0/"), Route::NotFound);
        assert_eq!(Route::parse("/api/v2.0/stations"), Route::NotFound);
        assert_eq!(Route::parse("/api/v1.0/a/b/c"), Route::NotFound);
        assert_eq!(Route::parse("/api/v1.0/a//"), Route::NotFound);
        assert_eq!(Route::parse("/favicon.ico"), Route::NotFound);
    }
}
