//! PostgreSQL analysis run repository implementation

use async_trait::async_trait;
use geovault_types::{AnalysisRunId, DatasetId, UserId};
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::AnalysisRunRow;
use crate::repo::{AnalysisRunRepository, CreateAnalysisRun};

/// PostgreSQL analysis run repository
#[derive(Clone)]
pub struct PgAnalysisRunRepository {
    pool: PgPool,
}

impl PgAnalysisRunRepository {
    /// Create a new analysis run repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisRunRepository for PgAnalysisRunRepository {
    async fn create(&self, run: CreateAnalysisRun) -> DbResult<AnalysisRunRow> {
        let params_json = serde_json::to_string(&run.params)?;
        let result_json = serde_json::to_string(&run.result)?;

        // user_id is copied from the dataset row, so a run can only be
        // attached to a dataset the caller owns
        let row = sqlx::query_as::<_, AnalysisRunRow>(
            r#"
            INSERT INTO analysis_runs (dataset_id, user_id, params_json, result_json, created_at)
            SELECT d.id, d.user_id, $3, $4, NOW()
            FROM datasets d
            WHERE d.id = $1 AND d.user_id = $2
            RETURNING id, dataset_id, user_id, params_json, result_json, created_at
            "#,
        )
        .bind(run.dataset_id.0)
        .bind(run.user_id.0)
        .bind(&params_json)
        .bind(&result_json)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        id: AnalysisRunId,
    ) -> DbResult<Option<AnalysisRunRow>> {
        let row = sqlx::query_as::<_, AnalysisRunRow>(
            r#"
            SELECT id, dataset_id, user_id, params_json, result_json, created_at
            FROM analysis_runs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_dataset(
        &self,
        user_id: UserId,
        dataset_id: DatasetId,
    ) -> DbResult<Vec<AnalysisRunRow>> {
        let rows = sqlx::query_as::<_, AnalysisRunRow>(
            r#"
            SELECT id, dataset_id, user_id, params_json, result_json, created_at
            FROM analysis_runs
            WHERE dataset_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(dataset_id.0)
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_for_user(&self, user_id: UserId, id: AnalysisRunId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM analysis_runs WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
