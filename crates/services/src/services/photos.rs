//! Photo lookup collaborator seam.
//!
//! Report assembly only needs "photos for these houses"; the trait keeps the
//! storage backend swappable and lets tests inject failures.

use std::collections::HashMap;

use async_trait::async_trait;
use db::models::house_photo::HousePhoto;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoLookupError {
    #[error("photo store database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("photo store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PhotoLookup: Send + Sync {
    async fn photos_for_houses(
        &self,
        house_numbers: &[i64],
    ) -> Result<HashMap<i64, Vec<HousePhoto>>, PhotoLookupError>;
}

/// Photo lookup backed by the local `house_photos` table.
pub struct DbPhotoLookup {
    pool: SqlitePool,
}

impl DbPhotoLookup {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoLookup for DbPhotoLookup {
    async fn photos_for_houses(
        &self,
        house_numbers: &[i64],
    ) -> Result<HashMap<i64, Vec<HousePhoto>>, PhotoLookupError> {
        let rows = HousePhoto::find_by_houses(&self.pool, house_numbers).await?;

        let mut by_house: HashMap<i64, Vec<HousePhoto>> = HashMap::new();
        for photo in rows {
            by_house.entry(photo.house_number).or_default().push(photo);
        }
        Ok(by_house)
    }
}
