//! User types

use serde::{Deserialize, Serialize};

/// Surrogate user identifier (`users.id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl UserId {
    /// Parse a user ID from a string
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Normalize an email address for storage and lookup.
///
/// Uniqueness is enforced by the database on the normalized form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
