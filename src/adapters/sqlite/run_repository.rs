//! SQLite implementation of the run registry and result sink.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{RunRequestData, TestSuiteSummary};
use crate::domain::ports::{ResultSink, RunRegistry};

#[derive(Clone)]
pub struct SqliteRunRepository {
    pool: SqlitePool,
}

impl SqliteRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a run request.
    pub async fn create_run(&self, run_id: &str, request: &RunRequestData) -> DomainResult<()> {
        let request_json = serde_json::to_string(request)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO runs (id, request_data, results, created_at, updated_at)
               VALUES (?, ?, NULL, ?, ?)"#
        )
        .bind(run_id)
        .bind(&request_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Read back the stored results of a run, if any have been recorded.
    pub async fn get_run_results(&self, run_id: &str) -> DomainResult<Option<TestSuiteSummary>> {
        let row: Option<(Option<String>,)> = sqlx::query_as("SELECT results FROM runs WHERE id = ?")
            .bind(run_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            None => Err(DomainError::RunNotFound(run_id.to_string())),
            Some((None,)) => Ok(None),
            Some((Some(json),)) => Ok(Some(serde_json::from_str(&json)?)),
        }
    }
}

#[async_trait]
impl RunRegistry for SqliteRunRepository {
    async fn get_run_def(&self, run_id: &str) -> DomainResult<RunRequestData> {
        let row: Option<RunRow> = sqlx::query_as("SELECT id, request_data FROM runs WHERE id = ?")
            .bind(run_id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| DomainError::RunNotFound(run_id.to_string()))?
            .try_into()
    }
}

#[async_trait]
impl ResultSink for SqliteRunRepository {
    async fn update_run_results(&self, run_id: &str, summary: &TestSuiteSummary) -> DomainResult<()> {
        let results_json = summary.to_json()?;

        let result = sqlx::query("UPDATE runs SET results = ?, updated_at = ? WHERE id = ?")
            .bind(&results_json)
            .bind(Utc::now().to_rfc3339())
            .bind(run_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RunNotFound(run_id.to_string()));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct RunRow {
    id: String,
    request_data: String,
}

impl TryFrom<RunRow> for RunRequestData {
    type Error = DomainError;

    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        serde_json::from_str(&row.request_data).map_err(|e| {
            DomainError::SerializationError(format!("Invalid request data for run {}: {e}", row.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::{Attributes, SuiteEntry, TestPlan};

    async fn setup_test_repo() -> SqliteRunRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteRunRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_run_def() {
        let repo = setup_test_repo().await;
        let request = RunRequestData::new(
            TestPlan::new()
                .with_executor("PROVIDER", ["test_put", "test_get"])
                .with_executor("CONSUMER", Vec::<String>::new()),
        );
        repo.create_run("68", &request).await.unwrap();

        let fetched = repo.get_run_def("68").await.unwrap();
        assert_eq!(fetched, request);
        assert_eq!(fetched.tests.primary().unwrap().executor, "PROVIDER");
    }

    #[tokio::test]
    async fn test_get_unknown_run_is_not_found() {
        let repo = setup_test_repo().await;
        let err = repo.get_run_def("0").await.unwrap_err();
        assert!(matches!(err, DomainError::RunNotFound(id) if id == "0"));
    }

    #[tokio::test]
    async fn test_corrupt_request_data_is_serialization_error() {
        let repo = setup_test_repo().await;
        sqlx::query("INSERT INTO runs (id, request_data, created_at, updated_at) VALUES ('7', 'not json', '', '')")
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.get_run_def("7").await.unwrap_err();
        assert!(matches!(err, DomainError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_update_run_results_round_trip() {
        let repo = setup_test_repo().await;
        repo.create_run("1", &RunRequestData::default()).await.unwrap();
        assert!(repo.get_run_results("1").await.unwrap().is_none());

        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), "suiteA".to_string());
        let mut summary = TestSuiteSummary::new();
        summary.insert("suiteA", SuiteEntry::new(attributes));

        repo.update_run_results("1", &summary).await.unwrap();

        let stored = repo.get_run_results("1").await.unwrap();
        assert_eq!(stored, Some(summary));
    }

    #[tokio::test]
    async fn test_update_unknown_run_fails() {
        let repo = setup_test_repo().await;
        let err = repo
            .update_run_results("missing", &TestSuiteSummary::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RunNotFound(_)));
    }
}
