//! House -> phase resolution, used for per-batch invoicing and reporting.
//!
//! Two modes exist because the system evolved from one to the other: phases
//! were first derived from completion order (batches of 50), later read from
//! a pre-agreed construction schedule. The mode is a startup configuration
//! choice, never inferred per call.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use db::models::{job_record::JobRecord, phase_assignment::PhaseAssignment};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use ts_rs::TS;

/// Batch size of a derived phase.
pub const PHASE_SIZE: usize = 50;

/// Upper bound on phase numbers in a fixed schedule. The schedule is a small
/// hand-curated table (6 phases in practice); a row far beyond this bound is
/// bad input, and accepting it would let one row blow up every per-phase loop
/// and allocation downstream.
pub const MAX_PHASES: i64 = 1000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PhaseMode {
    #[default]
    Derived,
    Fixed,
}

#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("phase number must be at least 1, got {0}")]
    InvalidPhase(i64),
    #[error("invalid phase assignment: house {house_number} -> phase {phase_number}")]
    InvalidAssignment {
        house_number: i64,
        phase_number: i64,
    },
}

/// Resolved phase plan for one report/session. Built once from a snapshot,
/// never mutated.
#[derive(Debug, Clone)]
pub enum PhasePlan {
    Derived {
        /// Houses with at least one non-deleted record, ordered by earliest
        /// `created_at`, ties broken by house number ascending.
        ordered_houses: Vec<i64>,
    },
    Fixed {
        houses_by_phase: BTreeMap<i64, Vec<i64>>,
        phase_by_house: HashMap<i64, i64>,
        total_phases: i64,
    },
}

impl PhasePlan {
    /// Derives phases from completion order: consecutive batches of
    /// [`PHASE_SIZE`] houses, batch k (1-indexed) is phase k.
    pub fn derived(records: &[JobRecord]) -> Self {
        let mut earliest: BTreeMap<i64, DateTime<Utc>> = BTreeMap::new();
        for record in records.iter().filter(|r| !r.is_deleted()) {
            earliest
                .entry(record.house_number)
                .and_modify(|t| *t = (*t).min(record.created_at))
                .or_insert(record.created_at);
        }

        let mut ordered: Vec<(DateTime<Utc>, i64)> = earliest
            .into_iter()
            .map(|(house_number, first)| (first, house_number))
            .collect();
        ordered.sort();

        Self::Derived {
            ordered_houses: ordered.into_iter().map(|(_, house)| house).collect(),
        }
    }

    /// Builds the plan from an externally supplied schedule. Rows are taken
    /// in input order; on a duplicate house number the first row wins and
    /// later ones are discarded silently. A row with house or phase below 1,
    /// or a phase beyond [`MAX_PHASES`], is rejected outright.
    pub fn fixed(assignments: &[PhaseAssignment]) -> Result<Self, PhaseError> {
        let mut houses_by_phase: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        let mut phase_by_house: HashMap<i64, i64> = HashMap::new();

        for assignment in assignments {
            if assignment.house_number < 1
                || assignment.phase_number < 1
                || assignment.phase_number > MAX_PHASES
            {
                return Err(PhaseError::InvalidAssignment {
                    house_number: assignment.house_number,
                    phase_number: assignment.phase_number,
                });
            }
            if phase_by_house.contains_key(&assignment.house_number) {
                tracing::debug!(
                    house_number = assignment.house_number,
                    phase_number = assignment.phase_number,
                    "duplicate house in phase schedule, keeping first assignment"
                );
                continue;
            }
            phase_by_house.insert(assignment.house_number, assignment.phase_number);
            houses_by_phase
                .entry(assignment.phase_number)
                .or_default()
                .push(assignment.house_number);
        }

        let total_phases = houses_by_phase.keys().next_back().copied().unwrap_or(1);
        for houses in houses_by_phase.values_mut() {
            houses.sort_unstable();
        }

        Ok(Self::Fixed {
            houses_by_phase,
            phase_by_house,
            total_phases,
        })
    }

    pub fn mode(&self) -> PhaseMode {
        match self {
            Self::Derived { .. } => PhaseMode::Derived,
            Self::Fixed { .. } => PhaseMode::Fixed,
        }
    }

    /// Always at least 1: a UI must have one selectable phase even with no
    /// houses at all.
    pub fn total_phases(&self) -> i64 {
        match self {
            Self::Derived { ordered_houses } => {
                (ordered_houses.len().div_ceil(PHASE_SIZE) as i64).max(1)
            }
            Self::Fixed { total_phases, .. } => *total_phases,
        }
    }

    /// Member houses of a phase, empty when the phase is beyond the range.
    /// Derived mode returns completion order, fixed mode house-number order.
    pub fn houses_in_phase(&self, phase_number: i64) -> Result<Vec<i64>, PhaseError> {
        if phase_number < 1 {
            return Err(PhaseError::InvalidPhase(phase_number));
        }
        match self {
            Self::Derived { ordered_houses } => {
                // checked: an arbitrarily large (but valid) phase number is
                // simply out of range, never an arithmetic overflow
                let start = match (phase_number as usize - 1).checked_mul(PHASE_SIZE) {
                    Some(start) if start < ordered_houses.len() => start,
                    _ => return Ok(Vec::new()),
                };
                let end = (start + PHASE_SIZE).min(ordered_houses.len());
                Ok(ordered_houses[start..end].to_vec())
            }
            Self::Fixed {
                houses_by_phase, ..
            } => Ok(houses_by_phase
                .get(&phase_number)
                .cloned()
                .unwrap_or_default()),
        }
    }

    pub fn phase_of(&self, house_number: i64) -> Option<i64> {
        match self {
            Self::Derived { ordered_houses } => ordered_houses
                .iter()
                .position(|&h| h == house_number)
                .map(|index| (index / PHASE_SIZE) as i64 + 1),
            Self::Fixed { phase_by_house, .. } => phase_by_house.get(&house_number).copied(),
        }
    }

    /// The full completion ordering backing a derived plan; `None` in fixed
    /// mode where no such ordering exists.
    pub fn houses_in_completion_order(&self) -> Option<&[i64]> {
        match self {
            Self::Derived { ordered_houses } => Some(ordered_houses),
            Self::Fixed { .. } => None,
        }
    }
}
