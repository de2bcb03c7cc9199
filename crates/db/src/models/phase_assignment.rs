use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// One row of the externally supplied house -> phase schedule. A house
/// belongs to at most one phase (`house_number` is the primary key).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PhaseAssignment {
    pub house_number: i64,
    pub phase_number: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePhaseAssignment {
    pub house_number: i64,
    pub phase_number: i64,
}

/// Outcome of a mapping import: how many rows landed and how many were
/// dropped as duplicate house numbers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct MappingImport {
    pub inserted: i64,
    pub discarded: i64,
}

impl PhaseAssignment {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PhaseAssignment>(
            "SELECT house_number, phase_number, created_at \
             FROM phase_assignments ORDER BY phase_number ASC, house_number ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Replaces the whole mapping in one transaction. On duplicate house
    /// numbers in the input the first row wins and later ones are discarded
    /// (`INSERT OR IGNORE` against the primary key).
    pub async fn replace_all(
        pool: &SqlitePool,
        rows: &[CreatePhaseAssignment],
    ) -> Result<MappingImport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM phase_assignments")
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0i64;
        for row in rows {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO phase_assignments (house_number, phase_number) \
                 VALUES ($1, $2)",
            )
            .bind(row.house_number)
            .bind(row.phase_number)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as i64;
        }

        tx.commit().await?;

        let discarded = rows.len() as i64 - inserted;
        if discarded > 0 {
            tracing::debug!(inserted, discarded, "phase mapping import dropped duplicate houses");
        }
        Ok(MappingImport { inserted, discarded })
    }
}
