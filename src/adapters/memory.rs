//! In-memory run store for testing and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{RunRequestData, TestSuiteSummary};
use crate::domain::ports::{ResultSink, RunRegistry};

/// Run registry and result sink backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryRunStore {
    runs: Arc<RwLock<HashMap<String, RunRequestData>>>,
    results: Arc<RwLock<HashMap<String, TestSuiteSummary>>>,
    writes: Arc<AtomicUsize>,
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_run(&self, run_id: impl Into<String>, request: RunRequestData) {
        self.runs.write().await.insert(run_id.into(), request);
    }

    pub async fn results(&self, run_id: &str) -> Option<TestSuiteSummary> {
        self.results.read().await.get(run_id).cloned()
    }

    /// Number of sink writes attempted, including rejected ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent sink writes fail with a database error.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl RunRegistry for InMemoryRunStore {
    async fn get_run_def(&self, run_id: &str) -> DomainResult<RunRequestData> {
        self.runs
            .read()
            .await
            .get(run_id)
            .cloned()
            .ok_or_else(|| DomainError::RunNotFound(run_id.to_string()))
    }
}

#[async_trait]
impl ResultSink for InMemoryRunStore {
    async fn update_run_results(&self, run_id: &str, summary: &TestSuiteSummary) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("writes rejected".to_string()));
        }
        if !self.runs.read().await.contains_key(run_id) {
            return Err(DomainError::RunNotFound(run_id.to_string()));
        }

        self.results
            .write()
            .await
            .insert(run_id.to_string(), summary.clone());
        Ok(())
    }
}
