//! Identifiers of user-owned resources

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::GeovaultError;

/// Surrogate dataset identifier (`datasets.id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub i32);

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Surrogate analysis run identifier (`analysis_runs.id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisRunId(pub i32);

impl std::fmt::Display for AnalysisRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied place identifier.
///
/// Places are created offline by clients, so their key is a globally unique
/// string token (a UUID in practice) rather than a database sequence value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Maximum length of a place ID (`places.id VARCHAR(36)`)
    pub const MAX_LEN: usize = 36;

    /// Validate a client-supplied place ID
    pub fn new(id: impl Into<String>) -> Result<Self, GeovaultError> {
        let id = id.into();
        if id.is_empty() || id.len() > Self::MAX_LEN || id.chars().any(char::is_whitespace) {
            return Err(GeovaultError::InvalidPlaceId(id));
        }
        Ok(Self(id))
    }

    /// Generate a fresh random place ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = GeovaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
