//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use geovault_types::{AnalysisRunId, BoundingBox, DatasetId, PlaceId, PlaceTags, UserId};
use sqlx::types::Json;
use sqlx::FromRow;

/// User row from the database
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Dataset row from the database
#[derive(Debug, Clone, FromRow)]
pub struct DatasetRow {
    pub id: i32,
    pub user_id: i32,
    pub filename: String,
    pub file_type: String,
    /// Opaque handle understood by the storage collaborator
    pub storage_path: String,
    pub n_points: i32,
    pub bbox_json: String,
    pub created_at: DateTime<Utc>,
}

/// Analysis run row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRunRow {
    pub id: i32,
    pub dataset_id: i32,
    pub user_id: i32,
    pub params_json: String,
    pub result_json: String,
    pub created_at: DateTime<Utc>,
}

/// Place row from the database
#[derive(Debug, Clone, FromRow)]
pub struct PlaceRow {
    pub id: String,
    pub user_id: i32,
    pub name: Option<String>,
    pub category: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub notes: Option<String>,
    pub tags: Option<Json<PlaceTags>>,
    pub created_at: DateTime<Utc>,
}

// Conversion implementations from Row types to geovault-types domain types
impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }
}

impl std::fmt::Debug for UserRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl DatasetRow {
    /// Convert to domain DatasetId
    pub fn dataset_id(&self) -> DatasetId {
        DatasetId(self.id)
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }

    /// Decode the stored bounding box
    pub fn bbox(&self) -> Result<BoundingBox, serde_json::Error> {
        serde_json::from_str(&self.bbox_json)
    }
}

impl AnalysisRunRow {
    /// Convert to domain AnalysisRunId
    pub fn analysis_run_id(&self) -> AnalysisRunId {
        AnalysisRunId(self.id)
    }

    /// Convert to domain DatasetId
    pub fn dataset_id(&self) -> DatasetId {
        DatasetId(self.dataset_id)
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }

    pub fn params(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.params_json)
    }

    pub fn result(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.result_json)
    }
}

impl PlaceRow {
    /// Convert to domain PlaceId (`None` if the stored key is not a valid ID)
    pub fn place_id(&self) -> Option<PlaceId> {
        PlaceId::new(self.id.as_str()).ok()
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }

    /// Tags attached to the place, empty when none were stored
    pub fn tags(&self) -> PlaceTags {
        self.tags.as_ref().map(|t| t.0.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_debug_hides_password_hash() {
        let row = UserRow {
            id: 1,
            email: "a@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };
        let debug = format!("{row:?}");
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_dataset_bbox_decodes() {
        let row = DatasetRow {
            id: 3,
            user_id: 1,
            filename: "points.geojson".to_string(),
            file_type: "geojson".to_string(),
            storage_path: "uploads/1/points.geojson".to_string(),
            n_points: 2,
            bbox_json: r#"{"min_lon":-1.0,"min_lat":50.0,"max_lon":1.0,"max_lat":52.0}"#.to_string(),
            created_at: Utc::now(),
        };
        let bbox = row.bbox().unwrap();
        assert!(bbox.contains(51.0, 0.0));
        assert_eq!(row.dataset_id(), DatasetId(3));
    }

    #[test]
    fn test_place_tags_default_empty() {
        let row = PlaceRow {
            id: "p-1".to_string(),
            user_id: 1,
            name: None,
            category: None,
            lat: 0.0,
            lon: 0.0,
            notes: None,
            tags: None,
            created_at: Utc::now(),
        };
        assert!(row.tags().is_empty());
        assert_eq!(row.place_id().unwrap().as_str(), "p-1");
    }
}
