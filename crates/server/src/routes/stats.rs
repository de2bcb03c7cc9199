//! Global statistics route.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::job_record::JobRecord;
use services::services::aggregation::{self, GlobalStats};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn get_global_stats(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<GlobalStats>>, ApiError> {
    let records = JobRecord::find_all(&state.db.pool).await?;
    let stats = aggregation::global_stats(&records)?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_global_stats))
}
