//! Routes for workers and their effort summaries.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    job_record::JobRecord,
    worker::{CreateWorker, Worker},
};
use serde::{Deserialize, Serialize};
use services::services::aggregation::{self, WorkerSummary};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WorkerWithSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub worker: Worker,
    pub summary: WorkerSummary,
}

pub async fn create_worker(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateWorker>,
) -> Result<ResponseJson<ApiResponse<Worker>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("worker name must not be blank".to_string()));
    }
    let worker = Worker::create(&state.db.pool, &payload, Uuid::new_v4()).await?;
    tracing::info!(worker_id = %worker.id, "worker created");
    Ok(ResponseJson(ApiResponse::success(worker)))
}

pub async fn list_workers(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Worker>>>, ApiError> {
    let workers = Worker::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(workers)))
}

pub async fn get_worker_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<WorkerWithSummary>>, ApiError> {
    let worker = Worker::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound("worker"))?;

    let records = JobRecord::find_all(&state.db.pool).await?;
    let summary = aggregation::aggregate_by_worker(&records, worker.id)?;

    Ok(ResponseJson(ApiResponse::success(WorkerWithSummary {
        worker,
        summary,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/workers",
        Router::new()
            .route("/", get(list_workers).post(create_worker))
            .route("/{id}/summary", get(get_worker_summary)),
    )
}
