use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Locator for a photo in external object storage. Image bytes and thumbnail
/// generation live outside this system; only the keys are tracked.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct HousePhoto {
    pub id: Uuid,
    pub house_number: i64,
    pub storage_key: String,
    pub thumbnail_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateHousePhoto {
    pub house_number: i64,
    pub storage_key: String,
    pub thumbnail_key: Option<String>,
}

impl HousePhoto {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateHousePhoto,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HousePhoto>(
            "INSERT INTO house_photos (id, house_number, storage_key, thumbnail_key) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, house_number, storage_key, thumbnail_key, created_at",
        )
        .bind(id)
        .bind(data.house_number)
        .bind(&data.storage_key)
        .bind(&data.thumbnail_key)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_house(
        pool: &SqlitePool,
        house_number: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HousePhoto>(
            "SELECT id, house_number, storage_key, thumbnail_key, created_at \
             FROM house_photos WHERE house_number = $1 ORDER BY created_at ASC",
        )
        .bind(house_number)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_houses(
        pool: &SqlitePool,
        house_numbers: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if house_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, house_number, storage_key, thumbnail_key, created_at \
             FROM house_photos WHERE house_number IN (",
        );
        let mut houses = query.separated(", ");
        for house_number in house_numbers {
            houses.push_bind(house_number);
        }
        query.push(") ORDER BY house_number ASC, created_at ASC");

        query.build_query_as::<HousePhoto>().fetch_all(pool).await
    }
}
