//! Forensics - post-run collection of distributed test results
//!
//! Waits for every executor of a test run to signal completion, parses the
//! JUnit XML reports they produced, and records a per-suite summary against
//! the run in the run registry.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the registry/sink ports
//! - **Service Layer** (`services`): Completion watching, report aggregation, orchestration
//! - **Adapters** (`adapters`): SQLite and in-memory port implementations
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use forensics::{Config, ForensicsService, InMemoryRunStore};
//!
//! let store = InMemoryRunStore::new();
//! let service = ForensicsService::new(&Config::default(), Arc::new(store.clone()), Arc::new(store));
//! let status = service.execute("68", std::path::Path::new("/runs")).await;
//! std::process::exit(status.code());
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryRunStore, SqliteRunRepository};
pub use domain::models::{
    Config, DatabaseConfig, ExitStatus, LoggingConfig, PollOutcome, RunDescriptor, RunLayout,
    RunOutcome, RunRequestData, SuiteEntry, TestPlan, TestSuiteSummary,
};
pub use domain::ports::{ResultSink, RunRegistry};
pub use domain::{AggregationError, DomainError, ForensicsError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CompletionWatcher, ForensicsService, ReportAggregator};
