/// Dataset connection and validation utilities
///
/// Opens the embedded SQLite dataset read-only, verifies the expected
/// tables exist, and defines the error taxonomy for everything that can
/// go wrong between this service and its storage.

use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};

/// Everything that can fail at the storage boundary.
#[derive(Debug)]
pub enum DatasetError {
    /// Dataset file does not exist at the configured path
    MissingDatabase(PathBuf),
    /// SQLite refused to open the file
    OpenFailed(rusqlite::Error),
    /// Required table missing from the dataset
    MissingTable(String),
    /// A startup aggregate found zero rows to work with
    NoData(String),
    /// A stored date was not in YYYY-MM-DD form
    MalformedDate(String),
    /// Trailing-year window anchor has no same-month/day date one year back
    /// (a Feb 29 max date in the dataset)
    UnrepresentableWindow(String),
    /// Query execution failed
    Query(rusqlite::Error),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::MissingDatabase(path) => {
                write!(f, "Dataset file not found: {}\n\n", path.display())?;
                write!(f, "  The service expects a SQLite file with 'station' and 'measurement' tables.\n")?;
                write!(f, "  Set the path in climate.toml ([database] path = ...) or via CLIMATE_DB_PATH.")
            }
            DatasetError::OpenFailed(e) => {
                write!(f, "Failed to open SQLite dataset.\n\n")?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  Common causes:\n")?;
                write!(f, "  - File is not a SQLite database\n")?;
                write!(f, "  - File permissions do not allow reading")
            }
            DatasetError::MissingTable(table) => {
                write!(f, "Required table '{}' does not exist in the dataset.\n\n", table)?;
                write!(f, "  The dataset must be provisioned before starting this service;\n")?;
                write!(f, "  this layer never creates schema or loads data.")
            }
            DatasetError::NoData(what) => {
                write!(f, "Dataset contains no rows for {}.\n\n", what)?;
                write!(f, "  Startup precomputation needs at least one measurement row.")
            }
            DatasetError::MalformedDate(date) => {
                write!(f, "Stored date '{}' is not in YYYY-MM-DD form.", date)
            }
            DatasetError::UnrepresentableWindow(date) => {
                write!(f, "No date exists one calendar year before '{}' ", date)?;
                write!(f, "(the trailing-year window keeps month and day fixed).")
            }
            DatasetError::Query(e) => {
                write!(f, "Dataset query failed: {}", e)
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::OpenFailed(e) | DatasetError::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DatasetError {
    fn from(e: rusqlite::Error) -> Self {
        DatasetError::Query(e)
    }
}

/// Open the dataset read-only and verify the expected schema is present.
///
/// This is the startup path: a missing file, unreadable file, or missing
/// table is fatal because the precomputed views cannot be built without
/// the full dataset.
pub fn open_dataset(path: &Path) -> Result<Connection, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingDatabase(path.to_path_buf()));
    }

    let conn = open_read_only(path)?;

    verify_table(&conn, "station")?;
    verify_table(&conn, "measurement")?;

    Ok(conn)
}

/// Open a short-lived read-only connection without schema verification.
///
/// Used by the per-request live queries; the schema was already verified
/// at startup.
pub fn open_read_only(path: &Path) -> Result<Connection, DatasetError> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(DatasetError::OpenFailed)
}

/// Verify a table exists in the dataset.
fn verify_table(conn: &Connection, table: &str) -> Result<(), DatasetError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )?;

    if !exists {
        return Err(DatasetError::MissingTable(table.to_string()));
    }

    Ok(())
}
