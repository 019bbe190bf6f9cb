//! Forensics run orchestration.
//!
//! Sequences one run end to end: validate the run directory, fetch the test
//! plan from the run registry, wait for completion markers, then aggregate the
//! primary executor's reports into the result sink. Every path ends in an
//! [`ExitStatus`]; nothing escapes `execute` as an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::errors::ForensicsError;
use crate::domain::models::{Config, ExitStatus, PollOutcome, RunDescriptor, RunLayout, RunOutcome};
use crate::domain::ports::{ResultSink, RunRegistry};
use crate::services::completion_watcher::CompletionWatcher;
use crate::services::report_aggregator::ReportAggregator;

/// Runs the forensics step for a single test run.
pub struct ForensicsService {
    registry: Arc<dyn RunRegistry>,
    watcher: CompletionWatcher,
    aggregator: ReportAggregator,
    layout: RunLayout,
    no_tests_is_failure: bool,
    app_version: String,
    system: String,
}

impl ForensicsService {
    pub fn new(config: &Config, registry: Arc<dyn RunRegistry>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            registry,
            watcher: CompletionWatcher::from_config(config),
            aggregator: ReportAggregator::new(sink),
            layout: config.layout,
            no_tests_is_failure: config.no_tests_is_failure,
            app_version: config.app_version.clone(),
            system: config.system.clone(),
        }
    }

    /// Run forensics and resolve the result to an exit status.
    ///
    /// Logs one line at start, one at completion, and one error line with the
    /// failing stage when anything goes wrong.
    pub async fn execute(&self, run_id: &str, run_dir: &Path) -> ExitStatus {
        info!(
            app_version = %self.app_version,
            system = %self.system,
            run_id,
            run_dir = %run_dir.display(),
            "Forensics start"
        );

        let status = match self.run(run_id, run_dir).await {
            Ok(_) => ExitStatus::Success,
            Err(err) => {
                error!(
                    run_id,
                    run_dir = %run_dir.display(),
                    stage = err.stage(),
                    error = %err,
                    "Error processing forensics request"
                );
                err.exit_status()
            }
        };

        info!(
            run_id,
            run_dir = %run_dir.display(),
            status = status.as_str(),
            exit_code = status.code(),
            "Forensics complete"
        );
        status
    }

    /// Like [`execute`](Self::execute), but on its own task so a panic in any
    /// stage is logged and reported as `ProcessingException`.
    pub async fn execute_isolated(self: Arc<Self>, run_id: String, run_dir: PathBuf) -> ExitStatus {
        let task = {
            let (run_id, run_dir) = (run_id.clone(), run_dir.clone());
            tokio::spawn(async move { self.execute(&run_id, &run_dir).await })
        };

        match task.await {
            Ok(status) => status,
            Err(err) => {
                let status = ExitStatus::ProcessingException;
                error!(
                    run_id = %run_id,
                    run_dir = %run_dir.display(),
                    stage = "unknown",
                    panicked = err.is_panic(),
                    error = %err,
                    "Unexpected fault processing forensics request"
                );
                info!(
                    run_id = %run_id,
                    run_dir = %run_dir.display(),
                    status = status.as_str(),
                    exit_code = status.code(),
                    "Forensics complete"
                );
                status
            }
        }
    }

    /// Run forensics for `run_id` whose files live beneath `run_dir`.
    #[instrument(skip(self), fields(run_dir = %run_dir.display()))]
    pub async fn run(&self, run_id: &str, run_dir: &Path) -> Result<RunOutcome, ForensicsError> {
        let is_dir = tokio::fs::metadata(run_dir)
            .await
            .is_ok_and(|metadata| metadata.is_dir());
        if !is_dir {
            return Err(ForensicsError::NoRunDirectory(run_dir.to_path_buf()));
        }

        let request = self
            .registry
            .get_run_def(run_id)
            .await
            .map_err(|source| ForensicsError::NoRunData {
                run_id: run_id.to_string(),
                source,
            })?;
        let plan = request.tests;

        let run = RunDescriptor::resolve(run_id, run_dir, self.layout);
        match self.watcher.await_completion(&run, &plan).await {
            PollOutcome::Completed => {}
            PollOutcome::NoTestsRequested if self.no_tests_is_failure => {
                return Err(ForensicsError::NoTestsRequested(run_id.to_string()))
            }
            PollOutcome::NoTestsRequested => {
                warn!(run_id, "No tests requested for run, nothing to aggregate");
                return Ok(RunOutcome::NoTestsRequested);
            }
            PollOutcome::TimedOut { waited } => {
                return Err(ForensicsError::TimedOut {
                    run_id: run_id.to_string(),
                    waited,
                })
            }
        }

        let executor = plan.primary().ok_or_else(|| ForensicsError::Processing {
            stage: "aggregate",
            message: "completed run has no executor".to_string(),
        })?;
        let reports_dir = run.reports_dir(&executor.executor);

        let summary = self.aggregator.aggregate(run_id, &reports_dir).await?;
        Ok(RunOutcome::ResultsRecorded {
            suites: summary.len(),
        })
    }
}
