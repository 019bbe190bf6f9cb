use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration file, merged when present.
pub const PROJECT_CONFIG_PATH: &str = ".forensics/config.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid check_interval: {0}. Must be at least 1 second")]
    InvalidCheckInterval(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database url cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Config file not found: {0}")]
    MissingFile(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .forensics/config.yaml (project config, optional)
    /// 3. The explicit `--config` file, which must exist when given
    /// 4. Environment variables (FORENSICS_* prefix, `__` for nesting)
    /// 5. Bare APP_VERSION and SYSTEM variables
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        Self::load_layered(Path::new(PROJECT_CONFIG_PATH), explicit)
    }

    fn load_layered(project: &Path, explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project));

        if let Some(path) = explicit {
            Self::require_file(path)?;
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed("FORENSICS_").split("__"))
            .merge(Env::raw().only(&["APP_VERSION", "SYSTEM"]))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(ConfigError::MissingFile(path.display().to_string()))
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // A zero max_wait is allowed; a zero interval is not
        if config.check_interval == 0 {
            return Err(ConfigError::InvalidCheckInterval(config.check_interval));
        }

        if config.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
