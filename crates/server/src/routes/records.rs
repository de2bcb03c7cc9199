//! Routes for job records (one logged visit to a house).

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::job_record::{CreateJobRecord, JobRecord, UpdateJobRecord};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub house: Option<i64>,
    pub worker: Option<Uuid>,
}

fn reject_negative(name: &'static str, minutes: Option<i64>) -> Result<(), ApiError> {
    match minutes {
        Some(m) if m < 0 => Err(ApiError::InvalidInput(format!(
            "{name} must be non-negative, got {m}"
        ))),
        _ => Ok(()),
    }
}

fn validate_create(data: &CreateJobRecord) -> Result<(), ApiError> {
    if data.house_number < 1 {
        return Err(ApiError::InvalidInput(format!(
            "house_number must be at least 1, got {}",
            data.house_number
        )));
    }
    reject_negative("sealant_minutes", data.sealant_minutes)?;
    reject_negative("glazing_minutes", data.glazing_minutes)?;
    reject_negative("vents_minutes", data.vents_minutes)?;
    reject_negative("vent_count", data.vent_count)?;
    reject_negative("hardware_minutes", data.hardware_minutes)?;
    reject_negative("other_minutes", data.other_minutes)?;
    Ok(())
}

fn validate_update(data: &UpdateJobRecord) -> Result<(), ApiError> {
    if let Some(house_number) = data.house_number
        && house_number < 1
    {
        return Err(ApiError::InvalidInput(format!(
            "house_number must be at least 1, got {house_number}"
        )));
    }
    reject_negative("sealant_minutes", data.sealant_minutes.flatten())?;
    reject_negative("glazing_minutes", data.glazing_minutes.flatten())?;
    reject_negative("vents_minutes", data.vents_minutes.flatten())?;
    reject_negative("vent_count", data.vent_count.flatten())?;
    reject_negative("hardware_minutes", data.hardware_minutes.flatten())?;
    reject_negative("other_minutes", data.other_minutes.flatten())?;
    Ok(())
}

pub async fn create_record(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateJobRecord>,
) -> Result<ResponseJson<ApiResponse<JobRecord>>, ApiError> {
    validate_create(&payload)?;
    let record = JobRecord::create(&state.db.pool, &payload, Uuid::new_v4()).await?;
    tracing::info!(record_id = %record.id, house_number = record.house_number, "job record created");
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<JobRecord>>>, ApiError> {
    let records = JobRecord::find_active(&state.db.pool, query.house, query.worker).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<JobRecord>>, ApiError> {
    let record = JobRecord::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound("job record"))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateJobRecord>,
) -> Result<ResponseJson<ApiResponse<JobRecord>>, ApiError> {
    validate_update(&payload)?;
    let record = JobRecord::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    JobRecord::soft_delete(&state.db.pool, id).await?;
    tracing::info!(record_id = %id, "job record soft-deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/records",
        Router::new()
            .route("/", get(list_records).post(create_record))
            .route(
                "/{id}",
                get(get_record).put(update_record).delete(delete_record),
            ),
    )
}
