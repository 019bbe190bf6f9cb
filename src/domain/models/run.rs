//! Run domain models: the resolved run location and the requested test plan.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory name holding an executor's test report files.
pub const TEST_REPORTS_DIR: &str = "test-reports";

/// Suffix of the sentinel file an executor writes once its tests have finished.
pub const COMPLETION_MARKER_SUFFIX: &str = "_tests.complete";

/// How a run's files are laid out beneath the directory given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLayout {
    /// Run files live under `<run_dir>/<run_id>/`.
    #[default]
    PerRun,
    /// Run files live directly under `<run_dir>/`.
    Flat,
}

impl RunLayout {
    /// Returns the string representation used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PerRun => "per_run",
            Self::Flat => "flat",
        }
    }
}

/// A run identifier together with its resolved on-disk locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    run_id: String,
    base_dir: PathBuf,
    run_dir: PathBuf,
}

impl RunDescriptor {
    /// Resolve the run directory for `run_id` beneath `base_dir`.
    pub fn resolve(run_id: impl Into<String>, base_dir: impl Into<PathBuf>, layout: RunLayout) -> Self {
        let run_id = run_id.into();
        let base_dir = base_dir.into();
        let run_dir = match layout {
            RunLayout::PerRun => base_dir.join(&run_id),
            RunLayout::Flat => base_dir.clone(),
        };

        Self {
            run_id,
            base_dir,
            run_dir,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The directory supplied by the caller.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The directory holding completion markers and executor folders.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Path of the completion marker for `executor`.
    pub fn marker_path(&self, executor: &str) -> PathBuf {
        self.run_dir
            .join(format!("{executor}{COMPLETION_MARKER_SUFFIX}"))
    }

    /// Path of the report directory for `executor`.
    pub fn reports_dir(&self, executor: &str) -> PathBuf {
        self.run_dir.join(executor).join(TEST_REPORTS_DIR)
    }
}

/// The tests requested from one executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorPlan {
    pub executor: String,
    /// Requested test identifiers. Empty means "all tests", which needs no waiting.
    pub tests: Vec<String>,
}

impl ExecutorPlan {
    /// True when the executor was given no explicit tests to wait for.
    pub fn is_vacuous(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Executors and their requested tests, in the order the run request lists them.
///
/// Serialized as a JSON object `{ "<executor>": ["<test>", ...] }`. Object key
/// order is preserved so the first listed executor stays the primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPlan {
    executors: Vec<ExecutorPlan>,
}

impl TestPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an executor, replacing any earlier entry with the same name in place.
    #[must_use]
    pub fn with_executor<I, S>(mut self, executor: impl Into<String>, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(executor.into(), tests.into_iter().map(Into::into).collect());
        self
    }

    fn insert(&mut self, executor: String, tests: Vec<String>) {
        if let Some(existing) = self.executors.iter_mut().find(|e| e.executor == executor) {
            existing.tests = tests;
        } else {
            self.executors.push(ExecutorPlan { executor, tests });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn executors(&self) -> &[ExecutorPlan] {
        &self.executors
    }

    /// The first executor listed; its reports are the ones aggregated.
    pub fn primary(&self) -> Option<&ExecutorPlan> {
        self.executors.first()
    }
}

impl Serialize for TestPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.executors.len()))?;
        for plan in &self.executors {
            map.serialize_entry(&plan.executor, &plan.tests)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TestPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlanVisitor;

        impl<'de> Visitor<'de> for PlanVisitor {
            type Value = TestPlan;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of executor name to requested test list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut plan = TestPlan::new();
                while let Some((executor, tests)) = access.next_entry::<String, Option<Vec<String>>>()? {
                    plan.insert(executor, tests.unwrap_or_default());
                }
                Ok(plan)
            }
        }

        deserializer.deserialize_map(PlanVisitor)
    }
}

/// The run request record held by the run registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRequestData {
    /// Requested tests per executor.
    #[serde(default)]
    pub tests: TestPlan,

    /// Remaining request fields, kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunRequestData {
    pub fn new(tests: TestPlan) -> Self {
        Self {
            tests,
            extra: serde_json::Map::new(),
        }
    }
}
