//! Completion watcher.
//!
//! Polls a run directory for the per-executor completion markers written when
//! a distributed test run finishes producing output. The first check happens
//! immediately; after that one check runs per interval until every executor is
//! done or the maximum wait has been spent.

use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::domain::models::{Config, PollOutcome, RunDescriptor, TestPlan};

/// Waits for the completion markers of every executor in a test plan.
#[derive(Debug, Clone)]
pub struct CompletionWatcher {
    max_wait: Duration,
    check_interval: Duration,
}

impl CompletionWatcher {
    pub const fn new(max_wait: Duration, check_interval: Duration) -> Self {
        Self {
            max_wait,
            check_interval,
        }
    }

    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.max_wait_duration(), config.check_interval_duration())
    }

    pub const fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub const fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Block until every executor in `plan` is done, the wait bound is reached,
    /// or the plan turns out to name no executors.
    ///
    /// An executor is done when its marker file exists or when it was asked to
    /// run no specific tests. The bound is checked before each sleep and the
    /// last sleep is shortened to land exactly on `max_wait`, so the total time
    /// slept never exceeds it. A zero interval gives up after the first check.
    #[instrument(skip(self, run, plan), fields(run_id = %run.run_id(), executors = plan.len()))]
    pub async fn await_completion(&self, run: &RunDescriptor, plan: &TestPlan) -> PollOutcome {
        if plan.is_empty() {
            info!("No executors in test plan, nothing to wait for");
            return PollOutcome::NoTestsRequested;
        }

        let mut waited = Duration::ZERO;
        loop {
            let pending = self.pending_executors(run, plan).await;
            if pending.is_empty() {
                info!(run_dir = %run.run_dir().display(), "End of testing marker found");
                return PollOutcome::Completed;
            }

            info!(
                run_dir = %run.run_dir().display(),
                pending = ?pending,
                "End of testing marker not found"
            );

            let nap = self.check_interval.min(self.max_wait.saturating_sub(waited));
            if nap.is_zero() {
                error!(
                    max_wait_secs = self.max_wait.as_secs(),
                    run_dir = %run.run_dir().display(),
                    "Results max wait time exceeded"
                );
                return PollOutcome::TimedOut { waited };
            }

            tokio::time::sleep(nap).await;
            waited += nap;
        }
    }

    /// Executors whose completion marker is still missing.
    async fn pending_executors<'a>(&self, run: &RunDescriptor, plan: &'a TestPlan) -> Vec<&'a str> {
        let mut pending = Vec::new();
        for executor in plan.executors() {
            if executor.is_vacuous() {
                debug!(executor = %executor.executor, "No specific tests requested, treating as complete");
                continue;
            }
            if !is_file(&run.marker_path(&executor.executor)).await {
                pending.push(executor.executor.as_str());
            }
        }
        pending
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RunLayout;
    use tempfile::TempDir;
    use tokio::time::Instant;

    fn setup_run(dir: &TempDir) -> RunDescriptor {
        let run = RunDescriptor::resolve("68", dir.path(), RunLayout::PerRun);
        std::fs::create_dir_all(run.run_dir()).unwrap();
        run
    }

    fn touch_marker(run: &RunDescriptor, executor: &str) {
        std::fs::write(run.marker_path(executor), b"").unwrap();
    }

    #[tokio::test]
    async fn test_empty_plan_is_no_tests_requested() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let watcher = CompletionWatcher::new(Duration::from_secs(30), Duration::from_secs(15));

        let outcome = watcher.await_completion(&run, &TestPlan::new()).await;
        assert_eq!(outcome, PollOutcome::NoTestsRequested);
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_present_completes_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        touch_marker(&run, "PROVIDER");
        let plan = TestPlan::new().with_executor("PROVIDER", ["a", "b"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(600), Duration::from_secs(15));

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;

        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vacuous_executor_completes_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", Vec::<String>::new());
        let watcher = CompletionWatcher::new(Duration::from_secs(600), Duration::from_secs(15));

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;

        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_marker_times_out_at_bound() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", ["a", "b"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(30), Duration::from_secs(15));

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;
        let elapsed = start.elapsed();

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                waited: Duration::from_secs(30)
            }
        );
        assert_eq!(elapsed, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_never_oversleeps_uneven_bound() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", ["a"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(40), Duration::from_secs(15));

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;
        let elapsed = start.elapsed();

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                waited: Duration::from_secs(40)
            }
        );
        assert_eq!(elapsed, Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_wait_times_out_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", ["a"]);
        let watcher = CompletionWatcher::new(Duration::ZERO, Duration::from_secs(15));

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;

        assert_eq!(outcome, PollOutcome::TimedOut { waited: Duration::ZERO });
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_appearing_later_completes() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", ["a"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(600), Duration::from_secs(15));

        let marker = run.marker_path("PROVIDER");
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(20)).await;
            std::fs::write(marker, b"").unwrap();
        });

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;
        writer.await.unwrap();

        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_executors_must_signal() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        touch_marker(&run, "PROVIDER");
        let plan = TestPlan::new()
            .with_executor("PROVIDER", ["a"])
            .with_executor("CONSUMER", ["b"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(15), Duration::from_secs(15));

        let outcome = watcher.await_completion(&run, &plan).await;
        assert!(matches!(outcome, PollOutcome::TimedOut { .. }));

        touch_marker(&run, "CONSUMER");
        let outcome = watcher.await_completion(&run, &plan).await;
        assert_eq!(outcome, PollOutcome::Completed);
    }

    #[tokio::test]
    async fn test_marker_directory_does_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        std::fs::create_dir(run.marker_path("PROVIDER")).unwrap();
        let plan = TestPlan::new().with_executor("PROVIDER", ["a"]);
        let watcher = CompletionWatcher::new(Duration::ZERO, Duration::from_secs(1));

        let outcome = watcher.await_completion(&run, &plan).await;
        assert!(matches!(outcome, PollOutcome::TimedOut { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_gives_up_after_first_check() {
        let dir = tempfile::tempdir().unwrap();
        let run = setup_run(&dir);
        let plan = TestPlan::new().with_executor("PROVIDER", ["a"]);
        let watcher = CompletionWatcher::new(Duration::from_secs(30), Duration::ZERO);

        let start = Instant::now();
        let outcome = watcher.await_completion(&run, &plan).await;

        assert_eq!(outcome, PollOutcome::TimedOut { waited: Duration::ZERO });
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        let watcher = CompletionWatcher::from_config(&config);
        assert_eq!(watcher.max_wait(), Duration::from_secs(600));
        assert_eq!(watcher.check_interval(), Duration::from_secs(15));
    }
}
