//! Result sink port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::TestSuiteSummary;

/// Destination for a run's aggregated test results.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store the summary as the results of `run_id`.
    async fn update_run_results(&self, run_id: &str, summary: &TestSuiteSummary) -> DomainResult<()>;
}
