/// Startup-computed result sets
///
/// Three of the five routes serve data that never changes over the process
/// lifetime. That data is computed exactly once here, before the listener
/// starts, and handed to the route layer as an immutable value - there is
/// no mutable global and nothing to synchronize.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::DatasetError;
use crate::model::{PrcpObservation, Station, TobsObservation};
use crate::queries;

/// Immutable process-lifetime state backing the cached routes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Trailing-year precipitation series, newest first.
    pub precipitation: Vec<PrcpObservation>,
    /// Full station directory.
    pub stations: Vec<Station>,
    /// Station with the most measurement rows (ties: lowest id).
    pub most_active_station: String,
    /// Trailing-year temperature series for the most-active station,
    /// oldest first.
    pub temperature: Vec<TobsObservation>,
}

impl Snapshot {
    /// Run the startup queries and build the snapshot.
    ///
    /// Fails on an empty measurement table or a leap-day window anchor;
    /// either way nothing can be served, so the caller aborts startup.
    pub fn build(conn: &Connection) -> Result<Self, DatasetError> {
        let max_date = queries::max_measurement_date(conn)?;
        let window_start = queries::trailing_year_start(max_date)?;
        let precipitation =
            queries::precipitation_series(conn, &fmt(window_start), &fmt(max_date))?;

        let stations = queries::all_stations(conn)?;

        let most_active = queries::most_active_station(conn)?;

        // The temperature window is anchored at the most-active station's
        // own latest measurement, which can trail the global max date.
        let station_max = queries::station_max_date(conn, &most_active)?;
        let station_window_start = queries::trailing_year_start(station_max)?;
        let temperature = queries::temperature_series(
            conn,
            &most_active,
            &fmt(station_window_start),
            &fmt(station_max),
        )?;

        Ok(Snapshot {
            precipitation,
            stations,
            most_active_station: most_active,
            temperature,
        })
    }
}

fn fmt(date: NaiveDate) -> String {
    date.format(queries::DATE_FORMAT).to_string()
}
