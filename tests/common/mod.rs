//! Common test utilities for integration tests
//!
//! Provides run directory fixtures and registry setup shared across the
//! integration test binaries.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use forensics::adapters::sqlite::create_migrated_test_pool;
use forensics::{RunRequestData, SqliteRunRepository, TestPlan};

/// JUnit report with one failing test case in suite `suiteA`.
pub const SUITE_A_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="suiteA" tests="1" failures="1" errors="0" time="0.12">
  <testcase classname="pkg.SuiteA" name="checks_contract" time="0.12">
    <failure message="expected 200" type="AssertionError">assert failed</failure>
  </testcase>
</testsuite>
"#;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Initialize a test-writer tracing subscriber; safe to call repeatedly.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A run directory laid out per run: `<base>/<run_id>/...`.
pub struct RunFixture {
    pub base: TempDir,
    pub run_id: String,
}

impl RunFixture {
    pub fn new(run_id: &str) -> Self {
        let fixture = Self {
            base: temp_dir(),
            run_id: run_id.to_string(),
        };
        fs::create_dir_all(fixture.run_dir()).expect("Failed to create run dir");
        fixture
    }

    /// The directory passed on the command line.
    pub fn base_dir(&self) -> &Path {
        self.base.path()
    }

    pub fn run_dir(&self) -> PathBuf {
        self.base.path().join(&self.run_id)
    }

    pub fn reports_dir(&self, executor: &str) -> PathBuf {
        self.run_dir().join(executor).join("test-reports")
    }

    pub fn mark_complete(&self, executor: &str) {
        fs::write(self.run_dir().join(format!("{executor}_tests.complete")), b"")
            .expect("Failed to write marker");
    }

    pub fn write_report(&self, executor: &str, file_name: &str, contents: &str) {
        let dir = self.reports_dir(executor);
        fs::create_dir_all(&dir).expect("Failed to create reports dir");
        fs::write(dir.join(file_name), contents).expect("Failed to write report");
    }
}

/// Registry backed by a migrated in-memory SQLite pool.
pub async fn sqlite_repository() -> SqliteRunRepository {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    SqliteRunRepository::new(pool)
}

/// Register `run_id` with a single executor asked to run `tests`.
pub async fn seed_run(repo: &SqliteRunRepository, run_id: &str, executor: &str, tests: &[&str]) {
    let plan = TestPlan::new().with_executor(executor, tests.iter().copied());
    repo.create_run(run_id, &RunRequestData::new(plan))
        .await
        .expect("Failed to seed run");
}
