//! Database errors

use geovault_types::GeovaultError;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::migrate::MigrationError;

/// Result type for storage operations
pub type DbResult<T> = Result<T, DbError>;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// A write was rejected by a uniqueness or referential constraint
    #[error("constraint violation: {0}")]
    Constraint(ConstraintViolation),

    /// Schema revision chain or target is inconsistent
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Structured column could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before it reached the database
    #[error("validation error: {0}")]
    Validation(#[from] GeovaultError),

    /// Any other SQLx error
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),
}

impl DbError {
    /// Returns the constraint violation, if this error is one
    pub fn constraint(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Constraint(violation) => Some(violation),
            _ => None,
        }
    }

    /// Check whether this error is a uniqueness violation (e.g. duplicate email)
    pub fn is_unique_violation(&self) -> bool {
        self.constraint()
            .is_some_and(|v| v.kind == ConstraintKind::Unique)
    }

    /// Check whether this error is a dangling foreign key
    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint()
            .is_some_and(|v| v.kind == ConstraintKind::ForeignKey)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let kind = match db_err.kind() {
                ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                _ => None,
            };
            if let Some(kind) = kind {
                return Self::Constraint(ConstraintViolation {
                    kind,
                    constraint: db_err.constraint().map(str::to_owned),
                    message: db_err.message().to_owned(),
                });
            }
        }
        Self::Sqlx(err)
    }
}

/// Kind of violated constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unique => write!(f, "unique"),
            Self::ForeignKey => write!(f, "foreign key"),
            Self::NotNull => write!(f, "not null"),
            Self::Check => write!(f, "check"),
        }
    }
}

/// A write rejected by the storage layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// Constraint name, when the driver reports one
    pub constraint: Option<String>,
    /// Driver message
    pub message: String,
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.constraint {
            Some(name) => write!(f, "{} ({name}): {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}
