/// Shared data types for the climate observations API
///
/// Every type here maps directly onto a JSON wire shape served by the
/// endpoint module, so field names match the JSON keys (with serde renames
/// where the API contract uses uppercase keys).

use serde::{Deserialize, Serialize};

/// Metadata for a single observation station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier, e.g. "USC00519397".
    pub station: String,
    /// Human-readable station name.
    pub name: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

/// One day of precipitation data. `prcp` is null in the source dataset
/// whenever the gauge reported nothing; absence is preserved, never coerced
/// to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrcpObservation {
    pub date: String,
    pub prcp: Option<f64>,
}

/// One day of observed temperature for a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TobsObservation {
    pub date: String,
    pub tobs: f64,
}

/// Min/max/avg temperature over a date range. All fields are null when no
/// measurement falls inside the range; that is a valid 200 response, not
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
}
