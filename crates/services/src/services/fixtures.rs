//! Shared test builders for job records.

use chrono::{DateTime, TimeZone, Utc};
use db::models::job_record::JobRecord;
use uuid::Uuid;

/// 08:00 UTC on the given day of January 2024.
pub fn january(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap()
}

/// A record with every task field empty; tests fill in what they assert on.
pub fn blank_record(house_number: i64, created_at: DateTime<Utc>) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        house_number,
        worker_id: None,
        sealant_minutes: None,
        sealant_remarks: None,
        glazing_minutes: None,
        glazing_remarks: None,
        glazing_reinstalled: None,
        vents_minutes: None,
        vents_remarks: None,
        vent_count: None,
        hardware_minutes: None,
        hardware_remarks: None,
        other_minutes: None,
        other_remarks: None,
        other_contact_name: None,
        other_contact_phone: None,
        created_at,
        deleted_at: None,
    }
}
