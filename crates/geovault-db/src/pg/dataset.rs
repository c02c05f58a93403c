//! PostgreSQL dataset repository implementation

use async_trait::async_trait;
use geovault_types::{DatasetId, UserId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::DatasetRow;
use crate::repo::{CreateDataset, DatasetRepository};

/// PostgreSQL dataset repository
#[derive(Clone)]
pub struct PgDatasetRepository {
    pool: PgPool,
}

impl PgDatasetRepository {
    /// Create a new dataset repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetRepository for PgDatasetRepository {
    async fn create(&self, dataset: CreateDataset) -> DbResult<DatasetRow> {
        let bbox_json = serde_json::to_string(&dataset.bbox)?;

        let row = sqlx::query_as::<_, DatasetRow>(
            r#"
            INSERT INTO datasets (user_id, filename, file_type, storage_path, n_points, bbox_json, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, user_id, filename, file_type, storage_path, n_points, bbox_json, created_at
            "#,
        )
        .bind(dataset.user_id.0)
        .bind(&dataset.filename)
        .bind(&dataset.file_type)
        .bind(&dataset.storage_path)
        .bind(dataset.n_points)
        .bind(&bbox_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<Option<DatasetRow>> {
        let row = sqlx::query_as::<_, DatasetRow>(
            r#"
            SELECT id, user_id, filename, file_type, storage_path, n_points, bbox_json, created_at
            FROM datasets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<DatasetRow>> {
        let rows = sqlx::query_as::<_, DatasetRow>(
            r#"
            SELECT id, user_id, filename, file_type, storage_path, n_points, bbox_json, created_at
            FROM datasets
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
