/// Service configuration loader - parses climate.toml
///
/// Keeps the dataset location and listener address out of code. The file
/// is optional; every field has a default matching the shipped dataset
/// layout, and environment variables (loaded from .env when present)
/// override the file for deployments that cannot write one.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATH: &str = "climate.toml";

/// Environment override for the dataset path.
const ENV_DB_PATH: &str = "CLIMATE_DB_PATH";
/// Environment override for the listener address.
const ENV_BIND: &str = "CLIMATE_BIND";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite dataset file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_db_path() -> String {
    "Resources/hawaii.sqlite".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from TOML text. Unknown sections are ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Loads service configuration: climate.toml when present, defaults
/// otherwise, then environment overrides on top.
///
/// # Panics
/// Panics if climate.toml exists but cannot be read or parsed. This is
/// intentional - starting with a half-applied configuration would serve
/// the wrong dataset silently.
pub fn load_config() -> ServiceConfig {
    dotenv::dotenv().ok();

    let mut config = if Path::new(CONFIG_PATH).exists() {
        let contents = fs::read_to_string(CONFIG_PATH)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", CONFIG_PATH, e));
        ServiceConfig::from_toml_str(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", CONFIG_PATH, e))
    } else {
        ServiceConfig::default()
    };

    if let Ok(path) = env::var(ENV_DB_PATH) {
        config.database.path = path;
    }
    if let Ok(bind) = env::var(ENV_BIND) {
        config.server.bind = bind;
    }

    config
}
