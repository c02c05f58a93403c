//! Auth errors

use geovault_db::{ConstraintViolation, DbError};
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately indistinguishable
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Invalid token (malformed, bad signature, wrong algorithm, missing claims)
    #[error("invalid token")]
    TokenInvalid,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// A write was rejected by the storage layer (e.g. duplicate email)
    #[error("constraint violation: {0}")]
    Constraint(ConstraintViolation),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::TokenInvalid | Self::TokenExpired => 401,
            Self::Constraint(_) => 409,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    ///
    /// Expired and invalid tokens share one code so callers cannot probe
    /// which check failed.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenInvalid | Self::TokenExpired => "UNAUTHENTICATED",
            Self::Constraint(_) => "CONSTRAINT_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check whether this error is a duplicate-key rejection
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Constraint(v) if v.kind == geovault_db::ConstraintKind::Unique)
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Constraint(violation) => {
                tracing::debug!("Constraint violation: {}", violation);
                Self::Constraint(violation)
            }
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other.to_string())
            }
        }
    }
}
