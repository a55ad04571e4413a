//! Runtime configuration, built once at startup and passed by reference.

use std::path::PathBuf;

/// Default MTA subway-alerts feed endpoint.
pub const DEFAULT_FEED_URL: &str =
    "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/camsys%2Fsubway-alerts.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed_url: String,
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
    pub stops_path: PathBuf,
}

impl AppConfig {
    /// Builds the configuration from CLI arguments plus the environment
    /// (`MTA_API_KEY`, typically supplied via a `.env` file).
    pub fn from_env(feed_url: String, stops_path: PathBuf) -> Self {
        Self {
            feed_url,
            api_key: std::env::var("MTA_API_KEY").ok(),
            stops_path,
        }
    }
}
