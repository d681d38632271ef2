//! Application settings, loaded once at startup and passed explicitly into
//! the components that need them. There is no ambient global configuration.

use crate::errors::{Error, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/inscribe.sqlite";
const DEFAULT_MEDIA_DIR: &str = "data/media";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Runtime configuration for the enrollment engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SeaORM connection string
    pub database_url: String,
    /// Root directory for the filesystem blob store
    pub media_dir: String,
    /// Seconds between expiration scheduler runs
    pub sweep_interval_secs: u64,
    /// Public front-end base URL, embedded in notification payloads so the
    /// candidate receives a self-service link carrying the access hash
    pub front_end_url: String,
}

impl AppConfig {
    /// Loads configuration from environment variables, applying defaults for
    /// everything except `FRONT_END_URL`.
    pub fn from_env() -> Result<Self> {
        let sweep_interval_secs = match std::env::var("SWEEP_INTERVAL_SECS") {
            Ok(raw) => raw.parse().map_err(|_| Error::Config {
                message: format!("SWEEP_INTERVAL_SECS is not a valid integer: '{raw}'"),
            })?,
            Err(_) => DEFAULT_SWEEP_INTERVAL_SECS,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            media_dir: std::env::var("MEDIA_DIR").unwrap_or_else(|_| DEFAULT_MEDIA_DIR.to_string()),
            sweep_interval_secs,
            front_end_url: std::env::var("FRONT_END_URL").map_err(|_| Error::Config {
                message: "FRONT_END_URL must be set".to_string(),
            })?,
        })
    }
}
