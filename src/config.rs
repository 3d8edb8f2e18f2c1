//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// JSON file backing the persistent store; in-memory store when unset
    pub data_file: Option<PathBuf>,
    /// Reload the mirror from the store once before serving traffic
    pub warm_on_startup: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATA_FILE` - Path of the store's JSON file (default: unset, in-memory)
    /// - `WARM_ON_STARTUP` - Reload the mirror at startup (default: true)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            data_file: env::var("DATA_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            warm_on_startup: env::var("WARM_ON_STARTUP")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            data_file: None,
            warm_on_startup: true,
        }
    }
}
