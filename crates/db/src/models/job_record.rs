use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// The closed set of task kinds a worker can log effort against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    Sealant,
    Glazing,
    Vents,
    Hardware,
    Other,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::Sealant,
        TaskKind::Glazing,
        TaskKind::Vents,
        TaskKind::Hardware,
        TaskKind::Other,
    ];
}

/// One worker's logged effort at one house on one visit.
///
/// All task columns are nullable; a record normally carries one or two kinds.
/// `deleted_at` is a soft-delete marker: the row stays, every aggregation and
/// listing skips it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct JobRecord {
    pub id: Uuid,
    pub house_number: i64,
    pub worker_id: Option<Uuid>,
    pub sealant_minutes: Option<i64>,
    pub sealant_remarks: Option<String>,
    pub glazing_minutes: Option<i64>,
    pub glazing_remarks: Option<String>,
    pub glazing_reinstalled: Option<bool>,
    pub vents_minutes: Option<i64>,
    pub vents_remarks: Option<String>,
    pub vent_count: Option<i64>,
    pub hardware_minutes: Option<i64>,
    pub hardware_remarks: Option<String>,
    pub other_minutes: Option<i64>,
    pub other_remarks: Option<String>,
    pub other_contact_name: Option<String>,
    pub other_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateJobRecord {
    pub house_number: i64,
    pub worker_id: Option<Uuid>,
    pub sealant_minutes: Option<i64>,
    pub sealant_remarks: Option<String>,
    pub glazing_minutes: Option<i64>,
    pub glazing_remarks: Option<String>,
    pub glazing_reinstalled: Option<bool>,
    pub vents_minutes: Option<i64>,
    pub vents_remarks: Option<String>,
    pub vent_count: Option<i64>,
    pub hardware_minutes: Option<i64>,
    pub hardware_remarks: Option<String>,
    pub other_minutes: Option<i64>,
    pub other_remarks: Option<String>,
    pub other_contact_name: Option<String>,
    pub other_contact_phone: Option<String>,
}

/// Partial update. An absent field keeps the stored value, an explicit `null`
/// clears it (tri-state via double option); `house_number` cannot be cleared.
/// `created_at` is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateJobRecord {
    pub house_number: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<Uuid>>")]
    pub worker_id: Option<Option<Uuid>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub sealant_minutes: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub sealant_remarks: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub glazing_minutes: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub glazing_remarks: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<bool>>")]
    pub glazing_reinstalled: Option<Option<bool>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub vents_minutes: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub vents_remarks: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub vent_count: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub hardware_minutes: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub hardware_remarks: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<i64>>")]
    pub other_minutes: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub other_remarks: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub other_contact_name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub other_contact_phone: Option<Option<String>>,
}

const JOB_RECORD_COLUMNS: &str = "id, house_number, worker_id, \
     sealant_minutes, sealant_remarks, \
     glazing_minutes, glazing_remarks, glazing_reinstalled, \
     vents_minutes, vents_remarks, vent_count, \
     hardware_minutes, hardware_remarks, \
     other_minutes, other_remarks, other_contact_name, other_contact_phone, \
     created_at, deleted_at";

fn merge<T: Clone>(patch: &Option<Option<T>>, current: &Option<T>) -> Option<T> {
    match patch {
        Some(value) => value.clone(),
        None => current.clone(),
    }
}

impl JobRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn minutes_for(&self, kind: TaskKind) -> Option<i64> {
        match kind {
            TaskKind::Sealant => self.sealant_minutes,
            TaskKind::Glazing => self.glazing_minutes,
            TaskKind::Vents => self.vents_minutes,
            TaskKind::Hardware => self.hardware_minutes,
            TaskKind::Other => self.other_minutes,
        }
    }

    pub fn remarks_for(&self, kind: TaskKind) -> Option<&str> {
        match kind {
            TaskKind::Sealant => self.sealant_remarks.as_deref(),
            TaskKind::Glazing => self.glazing_remarks.as_deref(),
            TaskKind::Vents => self.vents_remarks.as_deref(),
            TaskKind::Hardware => self.hardware_remarks.as_deref(),
            TaskKind::Other => self.other_remarks.as_deref(),
        }
    }

    /// A kind counts as performed when its minutes field or any of its
    /// structured flags is non-null. Zero minutes still counts; a
    /// remarks-only entry does not.
    pub fn performed(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Sealant => self.sealant_minutes.is_some(),
            TaskKind::Glazing => {
                self.glazing_minutes.is_some() || self.glazing_reinstalled.is_some()
            }
            TaskKind::Vents => self.vents_minutes.is_some() || self.vent_count.is_some(),
            TaskKind::Hardware => self.hardware_minutes.is_some(),
            TaskKind::Other => {
                self.other_minutes.is_some()
                    || self.other_contact_name.is_some()
                    || self.other_contact_phone.is_some()
            }
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateJobRecord,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO job_records (id, house_number, worker_id, \
                sealant_minutes, sealant_remarks, \
                glazing_minutes, glazing_remarks, glazing_reinstalled, \
                vents_minutes, vents_remarks, vent_count, \
                hardware_minutes, hardware_remarks, \
                other_minutes, other_remarks, other_contact_name, other_contact_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {JOB_RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .bind(data.house_number)
            .bind(data.worker_id)
            .bind(data.sealant_minutes)
            .bind(&data.sealant_remarks)
            .bind(data.glazing_minutes)
            .bind(&data.glazing_remarks)
            .bind(data.glazing_reinstalled)
            .bind(data.vents_minutes)
            .bind(&data.vents_remarks)
            .bind(data.vent_count)
            .bind(data.hardware_minutes)
            .bind(&data.hardware_remarks)
            .bind(data.other_minutes)
            .bind(&data.other_remarks)
            .bind(&data.other_contact_name)
            .bind(&data.other_contact_phone)
            .fetch_one(pool)
            .await
    }

    /// Every record, soft-deleted included; the aggregation layer owns the
    /// deletion filter. Ordered by creation time so remark concatenation is
    /// deterministic.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {JOB_RECORD_COLUMNS} FROM job_records ORDER BY created_at ASC, house_number ASC"
        );
        sqlx::query_as::<_, JobRecord>(&sql).fetch_all(pool).await
    }

    /// Listing query for the UI: non-deleted records, optionally filtered by
    /// house and/or worker.
    pub async fn find_active(
        pool: &SqlitePool,
        house_number: Option<i64>,
        worker_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {JOB_RECORD_COLUMNS} FROM job_records \
             WHERE deleted_at IS NULL \
               AND ($1 IS NULL OR house_number = $1) \
               AND ($2 IS NULL OR worker_id = $2) \
             ORDER BY created_at ASC, house_number ASC"
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(house_number)
            .bind(worker_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {JOB_RECORD_COLUMNS} FROM job_records WHERE id = $1");
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partial update per `UpdateJobRecord`. A missing or soft-deleted record
    /// is `RowNotFound`.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateJobRecord,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        if existing.is_deleted() {
            return Err(sqlx::Error::RowNotFound);
        }

        let sql = format!(
            "UPDATE job_records \
             SET house_number = $2, worker_id = $3, \
                 sealant_minutes = $4, sealant_remarks = $5, \
                 glazing_minutes = $6, glazing_remarks = $7, glazing_reinstalled = $8, \
                 vents_minutes = $9, vents_remarks = $10, vent_count = $11, \
                 hardware_minutes = $12, hardware_remarks = $13, \
                 other_minutes = $14, other_remarks = $15, \
                 other_contact_name = $16, other_contact_phone = $17 \
             WHERE id = $1 \
             RETURNING {JOB_RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .bind(data.house_number.unwrap_or(existing.house_number))
            .bind(merge(&data.worker_id, &existing.worker_id))
            .bind(merge(&data.sealant_minutes, &existing.sealant_minutes))
            .bind(merge(&data.sealant_remarks, &existing.sealant_remarks))
            .bind(merge(&data.glazing_minutes, &existing.glazing_minutes))
            .bind(merge(&data.glazing_remarks, &existing.glazing_remarks))
            .bind(merge(&data.glazing_reinstalled, &existing.glazing_reinstalled))
            .bind(merge(&data.vents_minutes, &existing.vents_minutes))
            .bind(merge(&data.vents_remarks, &existing.vents_remarks))
            .bind(merge(&data.vent_count, &existing.vent_count))
            .bind(merge(&data.hardware_minutes, &existing.hardware_minutes))
            .bind(merge(&data.hardware_remarks, &existing.hardware_remarks))
            .bind(merge(&data.other_minutes, &existing.other_minutes))
            .bind(merge(&data.other_remarks, &existing.other_remarks))
            .bind(merge(&data.other_contact_name, &existing.other_contact_name))
            .bind(merge(&data.other_contact_phone, &existing.other_contact_phone))
            .fetch_one(pool)
            .await
    }

    /// Marks the record deleted; the row is never physically erased here.
    /// Deleting a missing or already-deleted record is `RowNotFound`.
    pub async fn soft_delete(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE job_records SET deleted_at = datetime('now', 'subsec') \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_distinguishes_absent_from_explicit_null() {
        let patch: UpdateJobRecord =
            serde_json::from_str(r#"{"sealant_remarks": null, "glazing_minutes": 45}"#).unwrap();
        assert_eq!(patch.sealant_remarks, Some(None));
        assert_eq!(patch.glazing_minutes, Some(Some(45)));
        assert_eq!(patch.hardware_minutes, None);
    }

    #[test]
    fn test_update_payload_exports_a_typescript_decl() {
        let decl = UpdateJobRecord::decl();
        assert!(decl.contains("UpdateJobRecord"));
        assert!(decl.contains("worker_id"));
    }
}
