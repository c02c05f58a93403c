//! Repository traits
//!
//! Define async repository interfaces for database operations. Every
//! operation on an owned resource takes the owning `UserId`; a row owned by
//! another user behaves exactly like a missing row.

use async_trait::async_trait;
use geovault_types::{
    validate_coordinate, AnalysisRunId, BoundingBox, DatasetId, GeovaultError, PlaceId, PlaceTags,
    UserId,
};

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>>;

    /// Find a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user; a duplicate email is a unique constraint violation
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Replace the stored password hash; `DbError::NotFound` if the user is gone
    async fn update_password_hash(&self, id: UserId, password_hash: &str) -> DbResult<()>;

    /// Delete a user together with everything it owns.
    ///
    /// Returns `false` if no such user existed.
    async fn delete(&self, id: UserId) -> DbResult<bool>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// Dataset repository trait
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Record an uploaded dataset
    async fn create(&self, dataset: CreateDataset) -> DbResult<DatasetRow>;

    /// Find a dataset owned by the user
    async fn find_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<Option<DatasetRow>>;

    /// List the user's datasets, newest first
    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<DatasetRow>>;

    /// Delete a dataset and its analysis runs
    async fn delete_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<bool>;
}

/// Create dataset input
#[derive(Debug, Clone)]
pub struct CreateDataset {
    pub user_id: UserId,
    pub filename: String,
    pub file_type: String,
    pub storage_path: String,
    pub n_points: i32,
    pub bbox: BoundingBox,
}

/// Analysis run repository trait
#[async_trait]
pub trait AnalysisRunRepository: Send + Sync {
    /// Store a computed result.
    ///
    /// Fails with `DbError::NotFound` unless the dataset belongs to `run.user_id`.
    async fn create(&self, run: CreateAnalysisRun) -> DbResult<AnalysisRunRow>;

    /// Find an analysis run owned by the user
    async fn find_for_user(
        &self,
        user_id: UserId,
        id: AnalysisRunId,
    ) -> DbResult<Option<AnalysisRunRow>>;

    /// List runs over one of the user's datasets, newest first
    async fn list_for_dataset(
        &self,
        user_id: UserId,
        dataset_id: DatasetId,
    ) -> DbResult<Vec<AnalysisRunRow>>;

    /// Delete an analysis run
    async fn delete_for_user(&self, user_id: UserId, id: AnalysisRunId) -> DbResult<bool>;
}

/// Create analysis run input
#[derive(Debug, Clone)]
pub struct CreateAnalysisRun {
    pub user_id: UserId,
    pub dataset_id: DatasetId,
    pub params: serde_json::Value,
    pub result: serde_json::Value,
}

/// Place repository trait
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Save a place under its client-supplied ID.
    ///
    /// Out-of-range coordinates are rejected with `DbError::Validation`.
    async fn create(&self, place: CreatePlace) -> DbResult<PlaceRow>;

    /// Find a place owned by the user
    async fn find_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<Option<PlaceRow>>;

    /// List the user's places, newest first
    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<PlaceRow>>;

    /// Apply a partial update; `None` if the user owns no such place
    async fn update_for_user(
        &self,
        user_id: UserId,
        id: &PlaceId,
        update: PlaceUpdate,
    ) -> DbResult<Option<PlaceRow>>;

    /// Delete a place
    async fn delete_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<bool>;
}

/// Create place input
#[derive(Debug, Clone)]
pub struct CreatePlace {
    pub id: PlaceId,
    pub user_id: UserId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub notes: Option<String>,
    pub tags: Option<PlaceTags>,
}

impl CreatePlace {
    /// Reject coordinates outside the WGS84 range (NaN included)
    pub fn validate(&self) -> Result<(), GeovaultError> {
        validate_coordinate(self.lat, self.lon)
    }
}

/// Partial place update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct PlaceUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<PlaceTags>,
}
