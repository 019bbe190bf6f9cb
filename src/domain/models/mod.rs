//! Domain models for the forensics service.

pub mod config;
pub mod outcome;
pub mod report;
pub mod run;

pub use config::{Config, DatabaseConfig, LoggingConfig};
pub use outcome::{ExitStatus, PollOutcome, RunOutcome};
pub use report::{Attributes, DetailKind, DetailRecord, SuiteEntry, TestSuiteSummary};
pub use run::{
    ExecutorPlan, RunDescriptor, RunLayout, RunRequestData, TestPlan, COMPLETION_MARKER_SUFFIX,
    TEST_REPORTS_DIR,
};
