//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces the forensics service reaches
//! its collaborators through:
//! - RunRegistry: lookup of the run request and its test plan
//! - ResultSink: persistence of the aggregated test summary
//!
//! Adapters in `crate::adapters` implement these against SQLite or memory.

pub mod result_sink;
pub mod run_registry;

pub use result_sink::ResultSink;
pub use run_registry::RunRegistry;
