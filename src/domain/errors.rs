//! Error types for the forensics service.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::models::ExitStatus;

/// Errors returned by the run registry and result sink ports.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Failures while collecting report files into a summary.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Report directory not found: {}", .0.display())]
    NoReportDirectory(PathBuf),

    #[error("No report files found in {}", .0.display())]
    NoReportData(PathBuf),

    #[error("Failed to parse report {}: {source}", path.display())]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Report {} is not valid UTF-8: {source}", path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Report {} has no suite name on its root element", .0.display())]
    MissingSuiteName(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AggregationError {
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::NoReportDirectory(_) => ExitStatus::NoReportDirectory,
            Self::NoReportData(_) => ExitStatus::NoReportData,
            Self::ParseFailure { .. } | Self::InvalidEncoding { .. } | Self::MissingSuiteName(_) => {
                ExitStatus::ParseFailure
            }
            Self::Io { .. } => ExitStatus::ProcessingException,
        }
    }
}

/// Terminal failures of a forensics run, one variant per reported condition.
#[derive(Debug, Error)]
pub enum ForensicsError {
    #[error("Run directory not found: {}", .0.display())]
    NoRunDirectory(PathBuf),

    #[error("Run data not found for run {run_id}: {source}")]
    NoRunData {
        run_id: String,
        #[source]
        source: DomainError,
    },

    #[error("No tests requested for run {0}")]
    NoTestsRequested(String),

    #[error("Completion wait of {}s exceeded for run {run_id}", waited.as_secs())]
    TimedOut { run_id: String, waited: Duration },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("Failed to record results for run {run_id}: {source}")]
    Sink {
        run_id: String,
        #[source]
        source: DomainError,
    },

    #[error("Unexpected failure during {stage}: {message}")]
    Processing { stage: &'static str, message: String },
}

impl ForensicsError {
    /// The exit status reported for this failure.
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::NoRunDirectory(_) => ExitStatus::NoRunDirectory,
            Self::NoRunData { .. } => ExitStatus::NoRunData,
            Self::NoTestsRequested(_) => ExitStatus::NoTests,
            Self::TimedOut { .. } => ExitStatus::Timeout,
            Self::Aggregation(err) => err.exit_status(),
            Self::Sink { .. } => ExitStatus::SinkFailure,
            Self::Processing { .. } => ExitStatus::ProcessingException,
        }
    }

    /// The run stage the failure was detected in, for log context.
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::NoRunDirectory(_) => "validate",
            Self::NoRunData { .. } | Self::NoTestsRequested(_) => "plan",
            Self::TimedOut { .. } => "watch",
            Self::Aggregation(_) => "aggregate",
            Self::Sink { .. } => "persist",
            Self::Processing { stage, .. } => *stage,
        }
    }
}
