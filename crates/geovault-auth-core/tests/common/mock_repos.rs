//! Mock repositories for testing
//!
//! One in-memory store backs all four repository traits so that the
//! uniqueness and cascade rules of the real schema can be emulated.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use geovault_db::{
    AnalysisRunRepository, AnalysisRunRow, ConstraintKind, ConstraintViolation, CreateAnalysisRun,
    CreateDataset, CreatePlace, CreateUser, DatasetRepository, DatasetRow, DbError, DbResult,
    PlaceRepository, PlaceRow, PlaceUpdate, UserRepository, UserRow,
};
use geovault_types::{AnalysisRunId, DatasetId, PlaceId, UserId};
use sqlx::types::Json;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// In-memory store for testing
#[derive(Default, Clone)]
pub struct MockStore {
    next_id: Arc<AtomicI32>,
    users: Arc<DashMap<i32, UserRow>>,
    by_email: Arc<DashMap<String, i32>>,
    datasets: Arc<DashMap<i32, DatasetRow>>,
    runs: Arc<DashMap<i32, AnalysisRunRow>>,
    places: Arc<DashMap<String, PlaceRow>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user row directly, bypassing hashing
    pub fn insert_user(&self, email: &str, password_hash: &str) -> UserRow {
        let row = UserRow {
            id: self.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.by_email.insert(row.email.clone(), row.id);
        self.users.insert(row.id, row.clone());
        row
    }

    pub fn stored_hash(&self, id: UserId) -> Option<String> {
        self.users.get(&id.0).map(|u| u.password_hash.clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of datasets, runs and places owned by the user
    pub fn owned_count(&self, id: UserId) -> usize {
        self.datasets.iter().filter(|d| d.user_id == id.0).count()
            + self.runs.iter().filter(|r| r.user_id == id.0).count()
            + self.places.iter().filter(|p| p.user_id == id.0).count()
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn user_exists(&self, id: i32) -> bool {
        self.users.contains_key(&id)
    }

    fn dangling_user(id: UserId) -> DbError {
        DbError::Constraint(ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            constraint: None,
            message: format!("user {id} does not exist"),
        })
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id.0).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(DbError::Constraint(ConstraintViolation {
                kind: ConstraintKind::Unique,
                constraint: Some("ix_users_email".to_string()),
                message: format!("duplicate email {}", user.email),
            })),
            Entry::Vacant(slot) => {
                let row = UserRow {
                    id: self.next_id(),
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                };
                slot.insert(row.id);
                self.users.insert(row.id, row.clone());
                Ok(row)
            }
        }
    }

    async fn update_password_hash(&self, id: UserId, password_hash: &str) -> DbResult<()> {
        let mut user = self.users.get_mut(&id.0).ok_or(DbError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> DbResult<bool> {
        let Some((_, user)) = self.users.remove(&id.0) else {
            return Ok(false);
        };
        self.by_email.remove(&user.email);
        self.datasets.retain(|_, d| d.user_id != id.0);
        self.runs.retain(|_, r| r.user_id != id.0);
        self.places.retain(|_, p| p.user_id != id.0);
        Ok(true)
    }
}

#[async_trait]
impl DatasetRepository for MockStore {
    async fn create(&self, dataset: CreateDataset) -> DbResult<DatasetRow> {
        if !self.user_exists(dataset.user_id.0) {
            return Err(Self::dangling_user(dataset.user_id));
        }
        let row = DatasetRow {
            id: self.next_id(),
            user_id: dataset.user_id.0,
            filename: dataset.filename,
            file_type: dataset.file_type,
            storage_path: dataset.storage_path,
            n_points: dataset.n_points,
            bbox_json: serde_json::to_string(&dataset.bbox)?,
            created_at: Utc::now(),
        };
        self.datasets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<Option<DatasetRow>> {
        Ok(self
            .datasets
            .get(&id.0)
            .filter(|d| d.user_id == user_id.0)
            .map(|d| d.value().clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<DatasetRow>> {
        let mut rows: Vec<DatasetRow> = self
            .datasets
            .iter()
            .filter(|d| d.user_id == user_id.0)
            .map(|d| d.value().clone())
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn delete_for_user(&self, user_id: UserId, id: DatasetId) -> DbResult<bool> {
        let removed = self
            .datasets
            .remove_if(&id.0, |_, d| d.user_id == user_id.0)
            .is_some();
        if removed {
            self.runs.retain(|_, r| r.dataset_id != id.0);
        }
        Ok(removed)
    }
}

#[async_trait]
impl AnalysisRunRepository for MockStore {
    async fn create(&self, run: CreateAnalysisRun) -> DbResult<AnalysisRunRow> {
        let dataset = self
            .datasets
            .get(&run.dataset_id.0)
            .filter(|d| d.user_id == run.user_id.0)
            .map(|d| d.value().clone())
            .ok_or(DbError::NotFound)?;
        let row = AnalysisRunRow {
            id: self.next_id(),
            dataset_id: dataset.id,
            user_id: dataset.user_id,
            params_json: serde_json::to_string(&run.params)?,
            result_json: serde_json::to_string(&run.result)?,
            created_at: Utc::now(),
        };
        self.runs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        id: AnalysisRunId,
    ) -> DbResult<Option<AnalysisRunRow>> {
        Ok(self
            .runs
            .get(&id.0)
            .filter(|r| r.user_id == user_id.0)
            .map(|r| r.value().clone()))
    }

    async fn list_for_dataset(
        &self,
        user_id: UserId,
        dataset_id: DatasetId,
    ) -> DbResult<Vec<AnalysisRunRow>> {
        let mut rows: Vec<AnalysisRunRow> = self
            .runs
            .iter()
            .filter(|r| r.user_id == user_id.0 && r.dataset_id == dataset_id.0)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn delete_for_user(&self, user_id: UserId, id: AnalysisRunId) -> DbResult<bool> {
        Ok(self
            .runs
            .remove_if(&id.0, |_, r| r.user_id == user_id.0)
            .is_some())
    }
}

#[async_trait]
impl PlaceRepository for MockStore {
    async fn create(&self, place: CreatePlace) -> DbResult<PlaceRow> {
        place.validate()?;
        if !self.user_exists(place.user_id.0) {
            return Err(Self::dangling_user(place.user_id));
        }
        match self.places.entry(place.id.as_str().to_string()) {
            Entry::Occupied(_) => Err(DbError::Constraint(ConstraintViolation {
                kind: ConstraintKind::Unique,
                constraint: Some("places_pkey".to_string()),
                message: format!("duplicate place id {}", place.id),
            })),
            Entry::Vacant(slot) => {
                let row = PlaceRow {
                    id: place.id.as_str().to_string(),
                    user_id: place.user_id.0,
                    name: place.name,
                    category: place.category,
                    lat: place.lat,
                    lon: place.lon,
                    notes: place.notes,
                    tags: place.tags.map(Json),
                    created_at: Utc::now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<Option<PlaceRow>> {
        Ok(self
            .places
            .get(id.as_str())
            .filter(|p| p.user_id == user_id.0)
            .map(|p| p.value().clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<PlaceRow>> {
        let mut rows: Vec<PlaceRow> = self
            .places
            .iter()
            .filter(|p| p.user_id == user_id.0)
            .map(|p| p.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_for_user(
        &self,
        user_id: UserId,
        id: &PlaceId,
        update: PlaceUpdate,
    ) -> DbResult<Option<PlaceRow>> {
        let Some(mut place) = self
            .places
            .get_mut(id.as_str())
            .filter(|p| p.user_id == user_id.0)
        else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            place.name = Some(name);
        }
        if let Some(category) = update.category {
            place.category = Some(category);
        }
        if let Some(notes) = update.notes {
            place.notes = Some(notes);
        }
        if let Some(tags) = update.tags {
            place.tags = Some(Json(tags));
        }
        Ok(Some(place.clone()))
    }

    async fn delete_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<bool> {
        Ok(self
            .places
            .remove_if(id.as_str(), |_, p| p.user_id == user_id.0)
            .is_some())
    }
}
