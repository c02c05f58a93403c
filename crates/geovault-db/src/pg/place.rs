//! PostgreSQL place repository implementation

use async_trait::async_trait;
use geovault_types::{PlaceId, UserId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::PlaceRow;
use crate::repo::{CreatePlace, PlaceRepository, PlaceUpdate};

/// PostgreSQL place repository
#[derive(Clone)]
pub struct PgPlaceRepository {
    pool: PgPool,
}

impl PgPlaceRepository {
    /// Create a new place repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for PgPlaceRepository {
    async fn create(&self, place: CreatePlace) -> DbResult<PlaceRow> {
        place.validate()?;

        let row = sqlx::query_as::<_, PlaceRow>(
            r#"
            INSERT INTO places (id, user_id, name, category, lat, lon, notes, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING id, user_id, name, category, lat, lon, notes, tags, created_at
            "#,
        )
        .bind(place.id.as_str())
        .bind(place.user_id.0)
        .bind(&place.name)
        .bind(&place.category)
        .bind(place.lat)
        .bind(place.lon)
        .bind(&place.notes)
        .bind(place.tags.map(Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<Option<PlaceRow>> {
        let row = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, user_id, name, category, lat, lon, notes, tags, created_at
            FROM places
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<PlaceRow>> {
        let rows = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, user_id, name, category, lat, lon, notes, tags, created_at
            FROM places
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update_for_user(
        &self,
        user_id: UserId,
        id: &PlaceId,
        update: PlaceUpdate,
    ) -> DbResult<Option<PlaceRow>> {
        let row = sqlx::query_as::<_, PlaceRow>(
            r#"
            UPDATE places
            SET name = COALESCE($3, name),
                category = COALESCE($4, category),
                notes = COALESCE($5, notes),
                tags = COALESCE($6, tags)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, category, lat, lon, notes, tags, created_at
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.0)
        .bind(&update.name)
        .bind(&update.category)
        .bind(&update.notes)
        .bind(update.tags.map(Json))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_for_user(&self, user_id: UserId, id: &PlaceId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
