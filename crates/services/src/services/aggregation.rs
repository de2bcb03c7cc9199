//! Derived views over the job record set: per-house, per-worker, global.
//!
//! Everything here is a pure projection over an in-memory snapshot. Nothing
//! is cached; callers re-invoke when the underlying data changes. Soft-deleted
//! records are invisible to every function in this module.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use db::models::job_record::{JobRecord, TaskKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

/// Separator placed between remarks from different records of one house.
pub const REMARK_SEPARATOR: &str = " | ";

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("negative minutes ({minutes}) for {kind} on house {house_number}")]
    NegativeMinutes {
        house_number: i64,
        kind: TaskKind,
        minutes: i64,
    },
}

/// Per-kind slice of a house aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct TaskTotal {
    pub minutes: i64,
    pub performed: bool,
    pub remarks: Option<String>,
}

/// Derived per-house summary. Never stored; recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HouseAggregate {
    pub house_number: i64,
    pub tasks: BTreeMap<TaskKind, TaskTotal>,
    /// Distinct contributing workers, sorted for a stable wire shape.
    pub worker_ids: Vec<Uuid>,
    pub record_count: i64,
    pub first_logged_at: Option<DateTime<Utc>>,
    pub total_minutes: i64,
}

impl HouseAggregate {
    /// All-zero aggregate, used for scheduled houses without logged work.
    pub fn empty(house_number: i64) -> Self {
        Self {
            house_number,
            tasks: TaskKind::ALL
                .into_iter()
                .map(|kind| (kind, TaskTotal::default()))
                .collect(),
            worker_ids: Vec::new(),
            record_count: 0,
            first_logged_at: None,
            total_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct WorkerSummary {
    pub session_count: i64,
    pub distinct_house_count: i64,
    pub total_minutes: i64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct GlobalStats {
    pub total_sessions: i64,
    pub total_houses: i64,
    pub total_minutes: i64,
    pub total_hours: f64,
}

/// Minutes to tenths of an hour, rounded half-up. Integer arithmetic so
/// 0.05 h boundary values cannot drift through binary floats.
pub(crate) fn hours_tenths(minutes: i64) -> i64 {
    (minutes * 10 + 30) / 60
}

/// Minutes to hours at one-decimal precision, rounded half-up.
pub fn minutes_to_hours(minutes: i64) -> f64 {
    hours_tenths(minutes) as f64 / 10.0
}

fn validate_record(record: &JobRecord) -> Result<(), AggregationError> {
    for kind in TaskKind::ALL {
        if let Some(minutes) = record.minutes_for(kind)
            && minutes < 0
        {
            return Err(AggregationError::NegativeMinutes {
                house_number: record.house_number,
                kind,
                minutes,
            });
        }
    }
    Ok(())
}

fn visible(records: &[JobRecord]) -> impl Iterator<Item = &JobRecord> {
    records.iter().filter(|r| !r.is_deleted())
}

/// Folds the record set into one aggregate per house. A house whose every
/// record is soft-deleted gets no entry at all.
pub fn aggregate_by_house(
    records: &[JobRecord],
) -> Result<BTreeMap<i64, HouseAggregate>, AggregationError> {
    let mut houses: BTreeMap<i64, HouseAggregate> = BTreeMap::new();
    let mut workers: BTreeMap<i64, BTreeSet<Uuid>> = BTreeMap::new();

    for record in visible(records) {
        validate_record(record)?;

        let aggregate = houses
            .entry(record.house_number)
            .or_insert_with(|| HouseAggregate::empty(record.house_number));
        aggregate.record_count += 1;
        aggregate.first_logged_at = Some(
            aggregate
                .first_logged_at
                .map_or(record.created_at, |t| t.min(record.created_at)),
        );
        if let Some(worker_id) = record.worker_id {
            workers
                .entry(record.house_number)
                .or_default()
                .insert(worker_id);
        }

        for kind in TaskKind::ALL {
            let total = aggregate.tasks.entry(kind).or_default();
            total.minutes += record.minutes_for(kind).unwrap_or(0);
            total.performed |= record.performed(kind);
            if let Some(text) = record.remarks_for(kind) {
                let text = text.trim();
                if !text.is_empty() {
                    match &mut total.remarks {
                        Some(joined) => {
                            joined.push_str(REMARK_SEPARATOR);
                            joined.push_str(text);
                        }
                        None => total.remarks = Some(text.to_string()),
                    }
                }
            }
        }
    }

    for aggregate in houses.values_mut() {
        aggregate.total_minutes = aggregate.tasks.values().map(|t| t.minutes).sum();
        if let Some(ids) = workers.remove(&aggregate.house_number) {
            aggregate.worker_ids = ids.into_iter().collect();
        }
    }

    Ok(houses)
}

/// Totals for one worker. Records without a worker id never match, and are
/// excluded from the distinct house count as well.
pub fn aggregate_by_worker(
    records: &[JobRecord],
    worker_id: Uuid,
) -> Result<WorkerSummary, AggregationError> {
    let mut session_count = 0i64;
    let mut houses: BTreeSet<i64> = BTreeSet::new();
    let mut total_minutes = 0i64;

    for record in visible(records).filter(|r| r.worker_id == Some(worker_id)) {
        validate_record(record)?;
        session_count += 1;
        houses.insert(record.house_number);
        for kind in TaskKind::ALL {
            total_minutes += record.minutes_for(kind).unwrap_or(0);
        }
    }

    Ok(WorkerSummary {
        session_count,
        distinct_house_count: houses.len() as i64,
        total_minutes,
        total_hours: minutes_to_hours(total_minutes),
    })
}

/// Totals over the whole record set, regardless of worker.
pub fn global_stats(records: &[JobRecord]) -> Result<GlobalStats, AggregationError> {
    let mut total_sessions = 0i64;
    let mut houses: BTreeSet<i64> = BTreeSet::new();
    let mut total_minutes = 0i64;

    for record in visible(records) {
        validate_record(record)?;
        total_sessions += 1;
        houses.insert(record.house_number);
        for kind in TaskKind::ALL {
            total_minutes += record.minutes_for(kind).unwrap_or(0);
        }
    }

    Ok(GlobalStats {
        total_sessions,
        total_houses: houses.len() as i64,
        total_minutes,
        total_hours: minutes_to_hours(total_minutes),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::services::fixtures::{blank_record, january};

    #[test]
    fn test_house_with_only_deleted_records_is_invisible() {
        let mut deleted = blank_record(1, january(1));
        deleted.sealant_minutes = Some(30);
        deleted.deleted_at = Some(Utc::now());
        let mut live = blank_record(2, january(1));
        live.sealant_minutes = Some(10);

        let houses = aggregate_by_house(&[deleted, live]).unwrap();
        assert!(!houses.contains_key(&1));
        assert_eq!(houses[&2].total_minutes, 10);
    }

    #[test]
    fn test_null_minutes_sum_as_zero() {
        let mut record = blank_record(1, january(1));
        record.sealant_remarks = Some("kit only".to_string());
        let mut second = blank_record(1, january(2));
        second.hardware_minutes = Some(25);

        let houses = aggregate_by_house(&[record, second]).unwrap();
        let aggregate = &houses[&1];
        assert_eq!(aggregate.total_minutes, 25);
        assert_eq!(aggregate.tasks[&TaskKind::Sealant].minutes, 0);
        assert_eq!(aggregate.record_count, 2);
    }

    #[test]
    fn test_worker_summary_literal_case() {
        let worker_id = Uuid::new_v4();

        let mut first = blank_record(1, january(1));
        first.worker_id = Some(worker_id);
        first.sealant_minutes = Some(30);
        first.glazing_minutes = Some(15);
        first.vents_minutes = Some(10);
        first.hardware_minutes = Some(5);

        let mut second = blank_record(2, january(2));
        second.worker_id = Some(worker_id);
        second.hardware_minutes = Some(60);

        // no worker id: must not contribute anywhere
        let mut historic = blank_record(3, january(3));
        historic.sealant_minutes = Some(120);

        let summary = aggregate_by_worker(&[first, second, historic], worker_id).unwrap();
        assert_eq!(summary.total_minutes, 120);
        assert_eq!(summary.total_hours, 2.0);
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.distinct_house_count, 2);
    }

    #[test]
    fn test_remarks_concatenate_in_record_order_and_drop_blanks() {
        let mut first = blank_record(1, january(1));
        first.sealant_minutes = Some(5);
        first.sealant_remarks = Some("north side".to_string());
        let mut blank = blank_record(1, january(2));
        blank.sealant_remarks = Some("   ".to_string());
        let mut second = blank_record(1, january(3));
        second.sealant_remarks = Some("touch-up".to_string());

        let houses = aggregate_by_house(&[first, blank, second]).unwrap();
        assert_eq!(
            houses[&1].tasks[&TaskKind::Sealant].remarks.as_deref(),
            Some("north side | touch-up")
        );
    }

    #[test]
    fn test_structured_flag_marks_kind_performed_without_minutes() {
        let mut record = blank_record(1, january(1));
        record.vent_count = Some(4);
        record.glazing_minutes = Some(0);

        let houses = aggregate_by_house(&[record]).unwrap();
        let aggregate = &houses[&1];
        assert!(aggregate.tasks[&TaskKind::Vents].performed);
        assert_eq!(aggregate.tasks[&TaskKind::Vents].minutes, 0);
        assert!(aggregate.tasks[&TaskKind::Glazing].performed);
        assert!(!aggregate.tasks[&TaskKind::Sealant].performed);
    }

    #[test]
    fn test_remarks_alone_do_not_mark_performed() {
        let mut record = blank_record(1, january(1));
        record.hardware_remarks = Some("handles on order".to_string());

        let houses = aggregate_by_house(&[record]).unwrap();
        let hardware = &houses[&1].tasks[&TaskKind::Hardware];
        assert!(!hardware.performed);
        assert_eq!(hardware.remarks.as_deref(), Some("handles on order"));
    }

    #[test]
    fn test_negative_minutes_are_rejected() {
        let mut record = blank_record(7, january(1));
        record.vents_minutes = Some(-5);

        let err = aggregate_by_house(&[record]).unwrap_err();
        assert!(matches!(
            err,
            AggregationError::NegativeMinutes {
                house_number: 7,
                kind: TaskKind::Vents,
                minutes: -5
            }
        ));
    }

    #[test]
    fn test_empty_input_yields_zeroes_not_errors() {
        assert!(aggregate_by_house(&[]).unwrap().is_empty());

        let stats = global_stats(&[]).unwrap();
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_houses, 0);
        assert_eq!(stats.total_hours, 0.0);

        let summary = aggregate_by_worker(&[], Uuid::new_v4()).unwrap();
        assert_eq!(summary.session_count, 0);
        assert_eq!(summary.distinct_house_count, 0);
    }

    #[test]
    fn test_global_stats_count_distinct_houses() {
        let mut a = blank_record(1, january(1));
        a.sealant_minutes = Some(33);
        let mut b = blank_record(1, january(2));
        b.hardware_minutes = Some(10);
        let mut c = blank_record(5, january(3));
        c.other_minutes = Some(17);

        let stats = global_stats(&[a, b, c]).unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_houses, 2);
        assert_eq!(stats.total_minutes, 60);
        assert_eq!(stats.total_hours, 1.0);
    }

    #[test]
    fn test_rounding_is_half_up_not_bankers() {
        // 27 min = 0.45 h: half-up gives 0.5, banker's would give 0.4
        assert_eq!(minutes_to_hours(27), 0.5);
        // 33 min = 0.55 h: half-up gives 0.6
        assert_eq!(minutes_to_hours(33), 0.6);
        assert_eq!(minutes_to_hours(0), 0.0);
        assert_eq!(minutes_to_hours(120), 2.0);
    }

    #[test]
    fn test_earliest_timestamp_and_workers_tracked_per_house() {
        let worker_a = Uuid::new_v4();
        let worker_b = Uuid::new_v4();

        let mut late = blank_record(4, january(9));
        late.worker_id = Some(worker_a);
        late.sealant_minutes = Some(10);
        let mut early = blank_record(4, january(2));
        early.worker_id = Some(worker_b);
        early.sealant_minutes = Some(10);
        let mut repeat = blank_record(4, january(5));
        repeat.worker_id = Some(worker_a);

        let houses = aggregate_by_house(&[late, early, repeat]).unwrap();
        let aggregate = &houses[&4];
        assert_eq!(aggregate.first_logged_at, Some(january(2)));
        assert_eq!(aggregate.worker_ids.len(), 2);
        assert_eq!(aggregate.record_count, 3);
    }
}
