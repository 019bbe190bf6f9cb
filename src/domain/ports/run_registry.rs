//! Run registry port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::RunRequestData;

/// Read access to run request definitions.
#[async_trait]
pub trait RunRegistry: Send + Sync {
    /// Get the request definition for a run.
    ///
    /// Returns `DomainError::RunNotFound` when no run has this id.
    async fn get_run_def(&self, run_id: &str) -> DomainResult<RunRequestData>;
}
