//! Phase report assembly: the presentation-ready dataset for one phase.
//!
//! A scheduled house with no logged work still appears here with an all-zero
//! aggregate — the one deliberate asymmetry with the aggregation rules,
//! because an invoice must show a house that was scheduled even before work
//! starts.

use std::{collections::HashMap, sync::Arc};

use db::models::{house_photo::HousePhoto, job_record::JobRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use super::{
    aggregation::{self, AggregationError, HouseAggregate, hours_tenths},
    phases::{PhaseError, PhasePlan},
    photos::PhotoLookup,
};

/// Maximum photos per house on printed/PDF output.
pub const PRINT_PHOTO_CAP: usize = 6;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Per-house photo cap; `None` leaves gallery views uncapped.
    pub photo_cap: Option<usize>,
}

impl ReportOptions {
    pub fn print() -> Self {
        Self {
            photo_cap: Some(PRINT_PHOTO_CAP),
        }
    }

    pub fn screen() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PhaseReportHouse {
    pub aggregate: HouseAggregate,
    /// This house's minutes as hours, rounded to one decimal.
    pub hours: f64,
    pub photos: Vec<HousePhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PhaseReport {
    pub phase_number: i64,
    pub houses: Vec<PhaseReportHouse>,
    pub total_houses: i64,
    /// Sum of the per-house rounded figures, not a rounding of the raw sum.
    /// Downstream invoice reconciliation expects round-then-sum.
    pub total_hours: f64,
}

/// Pure assembly from already-fetched inputs.
pub fn assemble_phase_report(
    plan: &PhasePlan,
    phase_number: i64,
    records: &[JobRecord],
    photos_by_house: &HashMap<i64, Vec<HousePhoto>>,
    options: ReportOptions,
) -> Result<PhaseReport, ReportError> {
    let members = plan.houses_in_phase(phase_number)?;
    let mut aggregates = aggregation::aggregate_by_house(records)?;

    let mut houses = Vec::with_capacity(members.len());
    let mut total_tenths = 0i64;
    for house_number in members {
        let aggregate = aggregates
            .remove(&house_number)
            .unwrap_or_else(|| HouseAggregate::empty(house_number));

        let tenths = hours_tenths(aggregate.total_minutes);
        total_tenths += tenths;

        let mut photos = photos_by_house
            .get(&house_number)
            .cloned()
            .unwrap_or_default();
        if let Some(cap) = options.photo_cap {
            photos.truncate(cap);
        }

        houses.push(PhaseReportHouse {
            aggregate,
            hours: tenths as f64 / 10.0,
            photos,
        });
    }

    Ok(PhaseReport {
        phase_number,
        total_houses: houses.len() as i64,
        total_hours: total_tenths as f64 / 10.0,
        houses,
    })
}

/// Fetches photos for the member houses, then hands off to the pure assembly.
#[derive(Clone)]
pub struct ReportService {
    photos: Arc<dyn PhotoLookup>,
}

impl ReportService {
    pub fn new(photos: Arc<dyn PhotoLookup>) -> Self {
        Self { photos }
    }

    /// A photo lookup failure is downgraded to empty photo lists: a report
    /// with missing photos beats no report. This is the only place in the
    /// system where an error is swallowed, and it is logged.
    pub async fn build_phase_report(
        &self,
        plan: &PhasePlan,
        phase_number: i64,
        records: &[JobRecord],
        options: ReportOptions,
    ) -> Result<PhaseReport, ReportError> {
        let members = plan.houses_in_phase(phase_number)?;

        let photos_by_house = match self.photos.photos_for_houses(&members).await {
            Ok(photos) => photos,
            Err(error) => {
                tracing::warn!(
                    phase_number,
                    %error,
                    "photo lookup failed, continuing report with empty photo lists"
                );
                HashMap::new()
            }
        };

        assemble_phase_report(plan, phase_number, records, &photos_by_house, options)
    }
}
