//! Token subjects and issued credentials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identity string asserted by a bearer token (the `sub` claim)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    /// Create a subject from any identity string
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// Borrow the subject string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the subject as a user ID
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.0).ok()
    }
}

impl From<UserId> for Subject {
    fn from(id: UserId) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer token handed to a client after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Encoded, signed token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Absolute expiry of the token (UTC)
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a bearer access token
    pub fn bearer(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_at,
        }
    }
}
