//! Runtime configuration read from the environment (after `.env` is loaded).

use std::path::PathBuf;

pub const DEFAULT_DATA_SOURCE: &str = "cleaned_traffic_accidents.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_LOG_FILE: &str = "logs/accident_report.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path, `.gz` path, or URL of the accident CSV.
    pub data_source: String,
    pub bind_addr: String,
    pub log_file_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Reads `DATA_SOURCE`, `BIND_ADDR` and `LOG_FILE_PATH`, falling back to
    /// defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_source: get("DATA_SOURCE").unwrap_or(defaults.data_source),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            log_file_path: get("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
        }
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(mut self, data_source: Option<String>, bind_addr: Option<String>) -> Self {
        if let Some(data_source) = data_source {
            self.data_source = data_source;
        }
        if let Some(bind_addr) = bind_addr {
            self.bind_addr = bind_addr;
        }
        self
    }
}
