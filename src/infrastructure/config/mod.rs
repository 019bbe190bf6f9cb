//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Programmatic defaults
//! - Project and explicit YAML files
//! - Environment variable overrides
//! - Validation of the merged result

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, PROJECT_CONFIG_PATH};
