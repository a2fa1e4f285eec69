//! Runtime configuration from environment variables

use std::env;
use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "USAGE_DATA_PATH";
pub const TABLE_NAME_VAR: &str = "USAGE_TABLE_NAME";
pub const LOG_FILTER_VAR: &str = "USAGE_LOG";

/// Configuration for loading and serving the usage table
///
/// Loaded from environment variables with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CSV file read at startup
    pub data_path: PathBuf,

    /// Name given to every built table
    pub table_name: String,

    /// env_logger filter directive, e.g. `info` or `usagetable=debug`
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data.csv"),
            table_name: "users".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - `USAGE_DATA_PATH` (default: data.csv)
    /// - `USAGE_TABLE_NAME` (default: users)
    /// - `USAGE_LOG` (default: info)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Config::from_env) with a custom variable lookup.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Config {
            data_path: get(DATA_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            table_name: get(TABLE_NAME_VAR).unwrap_or(defaults.table_name),
            log_filter: get(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
        }
    }
}
