use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A field worker. Read by the core only to resolve display names and
/// attribute effort; `active` soft-retires a worker without losing history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateWorker {
    pub name: String,
    pub active: Option<bool>,
}

impl Worker {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateWorker,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Worker>(
            "INSERT INTO workers (id, name, active) VALUES ($1, $2, $3) \
             RETURNING id, name, active, created_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.active.unwrap_or(true))
        .fetch_one(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Worker>(
            "SELECT id, name, active, created_at FROM workers ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Worker>("SELECT id, name, active, created_at FROM workers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
