use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::run::RunLayout;

/// Main configuration structure for the forensics service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Application version, reported in log lines only
    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// Deployment/system name, reported in log lines only
    #[serde(default = "default_system")]
    pub system: String,

    /// Maximum total time to wait for completion markers, in seconds
    #[serde(default = "default_max_wait")]
    pub max_wait: u64,

    /// Time between completion marker checks, in seconds
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Run directory layout
    #[serde(default)]
    pub layout: RunLayout,

    /// Report a run that requested no tests as a failure instead of a success
    #[serde(default)]
    pub no_tests_is_failure: bool,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_app_version() -> String {
    "Version number not set".to_string()
}

fn default_system() -> String {
    "System name not set".to_string()
}

const fn default_max_wait() -> u64 {
    600
}

const fn default_check_interval() -> u64 {
    15
}

impl Config {
    pub const fn max_wait_duration(&self) -> Duration {
        Duration::from_secs(self.max_wait)
    }

    pub const fn check_interval_duration(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
            system: default_system(),
            max_wait: default_max_wait(),
            check_interval: default_check_interval(),
            layout: RunLayout::default(),
            no_tests_is_failure: false,
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// `SQLite` connection URL of the run registry
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite:.forensics/forensics.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
