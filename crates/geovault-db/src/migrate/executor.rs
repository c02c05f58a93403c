//! Execution of rendered migration steps against a live database

use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};

use super::Dialect;
use crate::error::DbResult;

const CREATE_VERSION_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS schema_revision (version_num VARCHAR(32) NOT NULL PRIMARY KEY)";

/// Database the migrator can drive.
///
/// `apply_step` must run the statements and the version update in one
/// transaction so a failed step leaves the recorded revision untouched.
#[async_trait]
pub trait SchemaExecutor: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Create the version table if it does not exist yet
    async fn ensure_version_table(&self) -> DbResult<()>;

    /// Revision recorded in the version table
    async fn current_revision(&self) -> DbResult<Option<String>>;

    /// Execute `statements` and record `revision` (`None` = base) atomically
    async fn apply_step(&self, statements: &[String], revision: Option<&str>) -> DbResult<()>;
}

#[async_trait]
impl SchemaExecutor for PgPool {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn ensure_version_table(&self) -> DbResult<()> {
        sqlx::query(CREATE_VERSION_TABLE).execute(self).await?;
        Ok(())
    }

    async fn current_revision(&self) -> DbResult<Option<String>> {
        let rev = sqlx::query_scalar::<_, String>("SELECT version_num FROM schema_revision")
            .fetch_optional(self)
            .await?;
        Ok(rev)
    }

    async fn apply_step(&self, statements: &[String], revision: Option<&str>) -> DbResult<()> {
        let mut tx = self.begin().await?;
        for sql in statements {
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM schema_revision").execute(&mut *tx).await?;
        if let Some(rev) = revision {
            sqlx::query("INSERT INTO schema_revision (version_num) VALUES ($1)")
                .bind(rev)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SchemaExecutor for SqlitePool {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn ensure_version_table(&self) -> DbResult<()> {
        sqlx::query(CREATE_VERSION_TABLE).execute(self).await?;
        Ok(())
    }

    async fn current_revision(&self) -> DbResult<Option<String>> {
        let rev = sqlx::query_scalar::<_, String>("SELECT version_num FROM schema_revision")
            .fetch_optional(self)
            .await?;
        Ok(rev)
    }

    async fn apply_step(&self, statements: &[String], revision: Option<&str>) -> DbResult<()> {
        let mut tx = self.begin().await?;
        for sql in statements {
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM schema_revision").execute(&mut *tx).await?;
        if let Some(rev) = revision {
            sqlx::query("INSERT INTO schema_revision (version_num) VALUES (?)")
                .bind(rev)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
