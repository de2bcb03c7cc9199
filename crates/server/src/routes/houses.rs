//! Routes for per-house aggregates and photo locators.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    house_photo::{CreateHousePhoto, HousePhoto},
    job_record::JobRecord,
};
use services::services::aggregation::{self, HouseAggregate};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_house_aggregates(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<HouseAggregate>>>, ApiError> {
    let records = JobRecord::find_all(&state.db.pool).await?;
    let houses = aggregation::aggregate_by_house(&records)?;
    Ok(ResponseJson(ApiResponse::success(
        houses.into_values().collect(),
    )))
}

/// 404 when the house has no non-deleted records: work that was explicitly
/// undone must never surface here.
pub async fn get_house_aggregate(
    State(state): State<AppState>,
    Path(house_number): Path<i64>,
) -> Result<ResponseJson<ApiResponse<HouseAggregate>>, ApiError> {
    let records = JobRecord::find_all(&state.db.pool).await?;
    let mut houses = aggregation::aggregate_by_house(&records)?;
    let aggregate = houses
        .remove(&house_number)
        .ok_or(ApiError::NotFound("house"))?;
    Ok(ResponseJson(ApiResponse::success(aggregate)))
}

/// Gallery listing, uncapped.
pub async fn list_house_photos(
    State(state): State<AppState>,
    Path(house_number): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Vec<HousePhoto>>>, ApiError> {
    let photos = HousePhoto::find_by_house(&state.db.pool, house_number).await?;
    Ok(ResponseJson(ApiResponse::success(photos)))
}

pub async fn create_photo(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateHousePhoto>,
) -> Result<ResponseJson<ApiResponse<HousePhoto>>, ApiError> {
    if payload.house_number < 1 {
        return Err(ApiError::InvalidInput(format!(
            "house_number must be at least 1, got {}",
            payload.house_number
        )));
    }
    if payload.storage_key.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "storage_key must not be blank".to_string(),
        ));
    }
    let photo = HousePhoto::create(&state.db.pool, &payload, Uuid::new_v4()).await?;
    tracing::info!(photo_id = %photo.id, house_number = photo.house_number, "photo registered");
    Ok(ResponseJson(ApiResponse::success(photo)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/houses",
            Router::new()
                .route("/", get(list_house_aggregates))
                .route("/{house_number}", get(get_house_aggregate))
                .route("/{house_number}/photos", get(list_house_photos)),
        )
        .route("/photos", post(create_photo))
}
