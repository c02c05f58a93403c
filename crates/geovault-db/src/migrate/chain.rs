//! Revision chain
//!
//! Migrations form an explicitly declared linear chain: the first step has
//! no predecessor and every later step names the step before it.

use std::collections::HashSet;

use thiserror::Error;

use super::schema::SchemaOp;

/// One versioned, reversible schema change
#[derive(Debug, Clone)]
pub struct Migration {
    /// Revision token stored in the version table once applied
    pub revision: &'static str,
    /// Revision this step builds on (`None` for the first step)
    pub down_revision: Option<&'static str>,
    pub description: &'static str,
    pub upgrade: fn() -> Vec<SchemaOp>,
    pub downgrade: fn() -> Vec<SchemaOp>,
}

/// Where to migrate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Empty schema, no revision applied
    Base,
    /// Latest revision in the chain
    Head,
    Revision(&'a str),
}

impl<'a> Target<'a> {
    /// Parse `base`, `head` or a revision token
    pub fn parse(s: &'a str) -> Self {
        match s {
            "base" => Self::Base,
            "head" => Self::Head,
            rev => Self::Revision(rev),
        }
    }
}

impl std::fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Head => write!(f, "head"),
            Self::Revision(rev) => write!(f, "{rev}"),
        }
    }
}

/// Migration ordering errors. All of them are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("migration chain is empty")]
    EmptyChain,

    #[error("duplicate revision {0}")]
    DuplicateRevision(String),

    #[error("revision {revision} declares predecessor {found:?}, expected {expected:?}")]
    BrokenChain {
        revision: String,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("unknown revision {0}")]
    UnknownRevision(String),

    #[error("cannot upgrade from {current} to {target}: target is not ahead")]
    TargetNotAhead { current: String, target: String },

    #[error("cannot downgrade from {current} to {target}: target is not behind")]
    TargetNotBehind { current: String, target: String },
}

/// Validated, ordered list of migrations
#[derive(Debug, Clone)]
pub struct MigrationChain {
    steps: Vec<Migration>,
}

impl MigrationChain {
    /// Validate the declared order of `steps`
    pub fn new(steps: Vec<Migration>) -> Result<Self, MigrationError> {
        if steps.is_empty() {
            return Err(MigrationError::EmptyChain);
        }

        let mut seen = HashSet::new();
        let mut expected: Option<&'static str> = None;
        for step in &steps {
            if !seen.insert(step.revision) {
                return Err(MigrationError::DuplicateRevision(step.revision.to_string()));
            }
            if step.down_revision != expected {
                return Err(MigrationError::BrokenChain {
                    revision: step.revision.to_string(),
                    expected: expected.map(str::to_string),
                    found: step.down_revision.map(str::to_string),
                });
            }
            expected = Some(step.revision);
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Migration] {
        &self.steps
    }

    /// Latest revision
    pub fn head(&self) -> &'static str {
        // non-empty by construction
        self.steps[self.steps.len() - 1].revision
    }

    /// Index of a revision in the chain
    pub fn position(&self, revision: &str) -> Result<usize, MigrationError> {
        self.steps
            .iter()
            .position(|s| s.revision == revision)
            .ok_or_else(|| MigrationError::UnknownRevision(revision.to_string()))
    }

    /// Number of steps applied when the schema is at `revision`
    fn applied_count(&self, revision: Option<&str>) -> Result<usize, MigrationError> {
        revision.map_or(Ok(0), |rev| self.position(rev).map(|i| i + 1))
    }

    fn target_count(&self, target: Target<'_>) -> Result<usize, MigrationError> {
        match target {
            Target::Base => Ok(0),
            Target::Head => Ok(self.steps.len()),
            Target::Revision(rev) => self.applied_count(Some(rev)),
        }
    }

    /// Steps to apply, in order, to go from `current` up to `target`
    pub fn upgrade_path(
        &self,
        current: Option<&str>,
        target: Target<'_>,
    ) -> Result<&[Migration], MigrationError> {
        let from = self.applied_count(current)?;
        let to = self.target_count(target)?;
        if to < from {
            return Err(MigrationError::TargetNotAhead {
                current: current.unwrap_or("base").to_string(),
                target: target.to_string(),
            });
        }
        Ok(&self.steps[from..to])
    }

    /// Steps to revert, newest first, to go from `current` down to `target`
    pub fn downgrade_path(
        &self,
        current: Option<&str>,
        target: Target<'_>,
    ) -> Result<Vec<&Migration>, MigrationError> {
        let from = self.applied_count(current)?;
        let to = self.target_count(target)?;
        if to > from {
            return Err(MigrationError::TargetNotBehind {
                current: current.unwrap_or("base").to_string(),
                target: target.to_string(),
            });
        }
        Ok(self.steps[to..from].iter().rev().collect())
    }
}
