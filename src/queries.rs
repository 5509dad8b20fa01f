/// Typed read-only queries against the station and measurement tables
///
/// Each function translates one logical query into SQL and returns typed
/// rows. Dates cross the storage boundary as `YYYY-MM-DD` text, so range
/// filters compare lexicographically - which for this format is also
/// calendar order.

use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};

use crate::db::DatasetError;
use crate::model::{PrcpObservation, Station, TemperatureSummary, TobsObservation};

/// Date format used throughout the measurement table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Trailing-year window arithmetic
// ---------------------------------------------------------------------------

/// Start of the trailing-year window ending at `anchor`: the same
/// month/day one calendar year earlier. This is not a rolling 365-day
/// window; a Feb 29 anchor has no counterpart in the prior year and is
/// rejected rather than silently shifted.
pub fn trailing_year_start(anchor: NaiveDate) -> Result<NaiveDate, DatasetError> {
    NaiveDate::from_ymd_opt(anchor.year() - 1, anchor.month(), anchor.day())
        .ok_or_else(|| DatasetError::UnrepresentableWindow(anchor.to_string()))
}

fn parse_stored_date(date: &str) -> Result<NaiveDate, DatasetError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| DatasetError::MalformedDate(date.to_string()))
}

// ---------------------------------------------------------------------------
// Aggregate queries
// ---------------------------------------------------------------------------

/// Most recent date across all measurements.
pub fn max_measurement_date(conn: &Connection) -> Result<NaiveDate, DatasetError> {
    let max: Option<String> =
        conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;

    match max {
        Some(date) => parse_stored_date(&date),
        None => Err(DatasetError::NoData("measurement".to_string())),
    }
}

/// Most recent date among one station's measurements.
pub fn station_max_date(conn: &Connection, station: &str) -> Result<NaiveDate, DatasetError> {
    let max: Option<String> = conn.query_row(
        "SELECT MAX(date) FROM measurement WHERE station = ?1",
        params![station],
        |row| row.get(0),
    )?;

    match max {
        Some(date) => parse_stored_date(&date),
        None => Err(DatasetError::NoData(format!("station {}", station))),
    }
}

/// Station with the most measurement rows. Ties are broken
/// deterministically in favor of the lowest station id.
pub fn most_active_station(conn: &Connection) -> Result<String, DatasetError> {
    let mut stmt = conn.prepare(
        "SELECT station, COUNT(*) AS n FROM measurement
         GROUP BY station
         ORDER BY n DESC, station ASC
         LIMIT 1",
    )?;

    let mut rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    match rows.next() {
        Some(station) => Ok(station?),
        None => Err(DatasetError::NoData("measurement".to_string())),
    }
}

/// MIN/MAX/AVG of observed temperature for `date >= since`, bounded above
/// by `through` when given. An unmatched range yields all-null fields.
pub fn temperature_summary(
    conn: &Connection,
    since: &str,
    through: Option<&str>,
) -> Result<TemperatureSummary, DatasetError> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(TemperatureSummary {
            tmin: row.get(0)?,
            tmax: row.get(1)?,
            tavg: row.get(2)?,
        })
    };

    let summary = match through {
        Some(through) => conn.query_row(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
             WHERE date >= ?1 AND date <= ?2",
            params![since, through],
            map,
        )?,
        None => conn.query_row(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
             WHERE date >= ?1",
            params![since],
            map,
        )?,
    };

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Series queries
// ---------------------------------------------------------------------------

/// Precipitation rows with date in `[since, through]`, newest first.
/// Null precipitation values are preserved.
pub fn precipitation_series(
    conn: &Connection,
    since: &str,
    through: &str,
) -> Result<Vec<PrcpObservation>, DatasetError> {
    let mut stmt = conn.prepare(
        "SELECT date, prcp FROM measurement
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date DESC",
    )?;

    let rows = stmt
        .query_map(params![since, through], |row| {
            Ok(PrcpObservation {
                date: row.get(0)?,
                prcp: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Temperature rows for one station with date in `[since, through]`,
/// oldest first.
pub fn temperature_series(
    conn: &Connection,
    station: &str,
    since: &str,
    through: &str,
) -> Result<Vec<TobsObservation>, DatasetError> {
    let mut stmt = conn.prepare(
        "SELECT date, tobs FROM measurement
         WHERE station = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC",
    )?;

    let rows = stmt
        .query_map(params![station, since, through], |row| {
            Ok(TobsObservation {
                date: row.get(0)?,
                tobs: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Full snapshot of the station table. No ordering contract.
pub fn all_stations(conn: &Connection) -> Result<Vec<Station>, DatasetError> {
    let mut stmt = conn.prepare(
        "SELECT station, name, latitude, longitude, elevation FROM station",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Station {
                station: row.get(0)?,
                name: row.get(1)?,
                latitude: row.get(2)?,
                longitude: row.get(3)?,
                elevation: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
