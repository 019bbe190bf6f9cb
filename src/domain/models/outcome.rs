//! Poll and run outcomes, and the process exit status contract.

use std::fmt;
use std::time::Duration;

/// Result of waiting for a run's completion markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every executor in the plan has signaled completion.
    Completed,
    /// The configured maximum wait elapsed first.
    TimedOut { waited: Duration },
    /// The plan names no executors, so there was nothing to wait for.
    NoTestsRequested,
}

/// Successful end states of a forensics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reports were parsed and handed to the result sink.
    ResultsRecorded { suites: usize },
    /// The run requested no tests; nothing was aggregated.
    NoTestsRequested,
}

/// Process exit status. The numeric values are a stable external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    SinkFailure = -1,
    InvalidArguments = -2,
    InvalidConfiguration = -3,
    NoReportData = -92,
    NoReportDirectory = -93,
    ParseFailure = -94,
    NoTests = -95,
    NoRunData = -96,
    NoRunDirectory = -97,
    Timeout = -98,
    ProcessingException = -99,
}

impl ExitStatus {
    /// Every status, for documentation and contract tests.
    pub const ALL: [Self; 12] = [
        Self::Success,
        Self::SinkFailure,
        Self::InvalidArguments,
        Self::InvalidConfiguration,
        Self::NoReportData,
        Self::NoReportDirectory,
        Self::ParseFailure,
        Self::NoTests,
        Self::NoRunData,
        Self::NoRunDirectory,
        Self::Timeout,
        Self::ProcessingException,
    ];

    /// The numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SinkFailure => "sink_failure",
            Self::InvalidArguments => "invalid_arguments",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::NoReportData => "no_report_data",
            Self::NoReportDirectory => "no_report_directory",
            Self::ParseFailure => "parse_failure",
            Self::NoTests => "no_tests",
            Self::NoRunData => "no_run_data",
            Self::NoRunDirectory => "no_run_directory",
            Self::Timeout => "timeout",
            Self::ProcessingException => "processing_exception",
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes: HashSet<i32> = ExitStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes.len(), ExitStatus::ALL.len());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::InvalidArguments.code(), -2);
        assert_eq!(ExitStatus::Timeout.code(), -98);
        assert_eq!(ExitStatus::NoRunDirectory.code(), -97);
        assert_eq!(ExitStatus::NoRunData.code(), -96);
        assert_eq!(ExitStatus::NoTests.code(), -95);
        assert_eq!(ExitStatus::ParseFailure.code(), -94);
        assert_eq!(ExitStatus::NoReportDirectory.code(), -93);
        assert_eq!(ExitStatus::NoReportData.code(), -92);
        assert_eq!(ExitStatus::ProcessingException.code(), -99);
    }

    #[test]
    fn test_only_success_exits_zero() {
        let successes: Vec<_> = ExitStatus::ALL.iter().filter(|s| s.code() == 0).collect();
        assert_eq!(successes, vec![&ExitStatus::Success]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitStatus::Timeout.to_string(), "timeout (-98)");
    }
}
