use db::{DBService, models::{job_record::JobRecord, phase_assignment::PhaseAssignment}};
use services::services::{
    phases::{PhaseMode, PhasePlan},
    report::ReportService,
};

use crate::error::ApiError;

pub mod config;
pub mod error;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub phase_mode: PhaseMode,
    pub reports: ReportService,
}

impl AppState {
    /// Resolves the phase plan for one request from the configured mode and
    /// the given record snapshot.
    pub async fn phase_plan(&self, records: &[JobRecord]) -> Result<PhasePlan, ApiError> {
        match self.phase_mode {
            PhaseMode::Derived => Ok(PhasePlan::derived(records)),
            PhaseMode::Fixed => {
                let assignments = PhaseAssignment::find_all(&self.db.pool).await?;
                Ok(PhasePlan::fixed(&assignments)?)
            }
        }
    }
}
