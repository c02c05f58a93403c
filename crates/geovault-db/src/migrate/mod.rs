//! Versioned schema migrations
//!
//! The schema is evolved by an explicit chain of [`Migration`] steps. Each
//! step describes its changes as [`SchemaOp`] values, which the [`Migrator`]
//! renders for the target [`Dialect`] and applies (or reverts) in chain
//! order, one transaction per step.

mod chain;
mod executor;
pub mod schema;
mod versions;

pub use chain::{Migration, MigrationChain, MigrationError, Target};
pub use executor::SchemaExecutor;
pub use schema::{Dialect, SchemaOp};

use crate::error::DbResult;

/// Applies and reverts a migration chain
#[derive(Debug, Clone)]
pub struct Migrator {
    chain: MigrationChain,
}

impl Migrator {
    /// Migrator over every revision shipped with this crate
    pub fn new() -> Result<Self, MigrationError> {
        Ok(Self::with_chain(MigrationChain::new(versions::all())?))
    }

    /// Migrator over a custom chain
    pub fn with_chain(chain: MigrationChain) -> Self {
        Self { chain }
    }

    /// Every known revision, oldest first
    pub fn history(&self) -> &[Migration] {
        self.chain.steps()
    }

    /// Revision currently applied, validated against the chain
    pub async fn current<E: SchemaExecutor>(&self, executor: &E) -> DbResult<Option<String>> {
        executor.ensure_version_table().await?;
        let current = executor.current_revision().await?;
        if let Some(rev) = current.as_deref() {
            self.chain.position(rev)?;
        }
        Ok(current)
    }

    /// Apply every step after the current revision up to `target`.
    ///
    /// Returns the revisions applied, oldest first.
    pub async fn upgrade<E: SchemaExecutor>(
        &self,
        executor: &E,
        target: Target<'_>,
    ) -> DbResult<Vec<&'static str>> {
        let current = self.current(executor).await?;
        let steps = self.chain.upgrade_path(current.as_deref(), target)?;
        let dialect = executor.dialect();

        let mut applied = Vec::with_capacity(steps.len());
        for step in steps {
            let statements: Vec<String> =
                (step.upgrade)().iter().map(|op| op.to_sql(dialect)).collect();
            tracing::info!(
                revision = step.revision,
                down_revision = ?step.down_revision,
                statements = statements.len(),
                "Upgrading schema: {}",
                step.description
            );
            executor.apply_step(&statements, Some(step.revision)).await?;
            applied.push(step.revision);
        }

        if applied.is_empty() {
            tracing::info!(current = ?current, "Schema already at {}", target);
        }
        Ok(applied)
    }

    /// Revert steps, newest first, from the current revision down to `target`.
    ///
    /// Returns the revisions reverted, newest first.
    pub async fn downgrade<E: SchemaExecutor>(
        &self,
        executor: &E,
        target: Target<'_>,
    ) -> DbResult<Vec<&'static str>> {
        let current = self.current(executor).await?;
        let steps = self.chain.downgrade_path(current.as_deref(), target)?;
        let dialect = executor.dialect();

        let mut reverted = Vec::with_capacity(steps.len());
        for step in steps {
            let statements: Vec<String> =
                (step.downgrade)().iter().map(|op| op.to_sql(dialect)).collect();
            tracing::info!(
                revision = step.revision,
                down_revision = ?step.down_revision,
                statements = statements.len(),
                "Downgrading schema: {}",
                step.description
            );
            executor.apply_step(&statements, step.down_revision).await?;
            reverted.push(step.revision);
        }

        Ok(reverted)
    }

    /// Rendered statements of one revision's upgrade, for dry runs
    pub fn upgrade_sql(&self, revision: &str, dialect: Dialect) -> DbResult<Vec<String>> {
        let step = &self.chain.steps()[self.chain.position(revision)?];
        Ok((step.upgrade)().iter().map(|op| op.to_sql(dialect)).collect())
    }
}
