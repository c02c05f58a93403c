//! Common test utilities for geovault-db integration tests

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Single-connection in-memory SQLite database with foreign keys enforced.
///
/// Every connection to `sqlite::memory:` is its own database, so the pool
/// must never open a second one or drop the first.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap()
}

/// Names of all tables and indices, excluding SQLite internals
pub async fn schema_objects(pool: &SqlitePool) -> Vec<(String, String)> {
    sqlx::query_as::<_, (String, String)>(
        "SELECT type, name FROM sqlite_master \
         WHERE name NOT LIKE 'sqlite_%' AND name <> 'schema_revision' \
         ORDER BY type, name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// DDL of all tables and indices, excluding SQLite internals
pub async fn schema_sql(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT sql FROM sqlite_master \
         WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' AND name <> 'schema_revision' \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

pub async fn insert_user(pool: &SqlitePool, email: &str) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(email)
    .bind("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA")
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn insert_dataset(pool: &SqlitePool, user_id: i32) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO datasets (user_id, filename, file_type, storage_path, n_points, bbox_json, created_at) \
         VALUES (?, 'points.csv', 'csv', 'uploads/points.csv', 3, '{}', ?) RETURNING id",
    )
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn insert_analysis_run(
    pool: &SqlitePool,
    dataset_id: i32,
    user_id: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO analysis_runs (dataset_id, user_id, params_json, result_json, created_at) \
         VALUES (?, ?, '{\"k\":3}', '{\"clusters\":[]}', ?) RETURNING id",
    )
    .bind(dataset_id)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn insert_place(pool: &SqlitePool, id: &str, user_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO places (id, user_id, name, lat, lon, tags, created_at) \
         VALUES (?, ?, 'Corner cafe', 51.5, -0.12, '{\"amenity\":\"cafe\"}', ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
