//! Routes for phase membership, the fixed mapping import, and phase reports.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    job_record::JobRecord,
    phase_assignment::{CreatePhaseAssignment, MappingImport, PhaseAssignment},
};
use serde::{Deserialize, Serialize};
use services::services::{
    phases::{MAX_PHASES, PhaseMode},
    report::{PhaseReport, ReportOptions},
};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PhaseSummary {
    pub phase_number: i64,
    pub house_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PhaseOverview {
    pub mode: PhaseMode,
    pub total_phases: i64,
    pub phases: Vec<PhaseSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub print: Option<bool>,
}

pub async fn get_phase_overview(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<PhaseOverview>>, ApiError> {
    let records = JobRecord::find_all(&state.db.pool).await?;
    let plan = state.phase_plan(&records).await?;

    let total_phases = plan.total_phases();
    let mut phases = Vec::with_capacity(total_phases as usize);
    for phase_number in 1..=total_phases {
        phases.push(PhaseSummary {
            phase_number,
            house_count: plan.houses_in_phase(phase_number)?.len() as i64,
        });
    }

    Ok(ResponseJson(ApiResponse::success(PhaseOverview {
        mode: plan.mode(),
        total_phases,
        phases,
    })))
}

/// Imports the fixed house -> phase schedule, replacing the previous one.
/// Every row is validated before anything is written.
pub async fn import_phase_mapping(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<Vec<CreatePhaseAssignment>>,
) -> Result<ResponseJson<ApiResponse<MappingImport>>, ApiError> {
    for row in &payload {
        if row.house_number < 1 || row.phase_number < 1 || row.phase_number > MAX_PHASES {
            return Err(ApiError::InvalidInput(format!(
                "invalid mapping row: house {} -> phase {} (phase must be 1..={MAX_PHASES})",
                row.house_number, row.phase_number
            )));
        }
    }

    let outcome = PhaseAssignment::replace_all(&state.db.pool, &payload).await?;
    tracing::info!(
        inserted = outcome.inserted,
        discarded = outcome.discarded,
        "phase mapping imported"
    );
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn get_phase_report(
    State(state): State<AppState>,
    Path(phase_number): Path<i64>,
    Query(query): Query<ReportQuery>,
) -> Result<ResponseJson<ApiResponse<PhaseReport>>, ApiError> {
    let records = JobRecord::find_all(&state.db.pool).await?;
    let plan = state.phase_plan(&records).await?;

    let options = if query.print.unwrap_or(false) {
        ReportOptions::print()
    } else {
        ReportOptions::screen()
    };

    let report = state
        .reports
        .build_phase_report(&plan, phase_number, &records, options)
        .await?;
    Ok(ResponseJson(ApiResponse::success(report)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/phases",
        Router::new()
            .route("/", get(get_phase_overview))
            .route("/mapping", put(import_phase_mapping))
            .route("/{phase_number}/report", get(get_phase_report)),
    )
}
