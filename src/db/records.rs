//! Emergency record operations: conditional insert, status update, lookup.
//!
//! Every operation is a single independent statement; no transactions.
//! Uniqueness of `emergency_id` is enforced by the primary key, so the
//! insert is an atomic insert-if-absent rather than check-then-insert.

use crate::error::{Error, Result};
use crate::model::{EmergencyEvent, EmergencyRecord, Status};
use crate::telemetry::metrics;
use opentelemetry::KeyValue;

impl super::Db {
    /// Look up a record by `emergency_id`. Absence is not an error.
    pub async fn find_emergency(&self, id: &str) -> Result<Option<EmergencyRecord>> {
        let row: Option<EmergencyRow> = sqlx::query_as(
            "SELECT emergency_id, status, details, created_at, updated_at
             FROM emergencies WHERE emergency_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EmergencyRow::try_into_record).transpose()
    }

    /// Look up a record by `emergency_id`, erroring if it does not exist.
    pub async fn get_emergency(&self, id: &str) -> Result<EmergencyRecord> {
        self.find_emergency(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Insert a new record for `event` with status Active.
    ///
    /// `ON CONFLICT DO NOTHING` on the primary key makes this safe under
    /// concurrent delivery of the same id: exactly one insert wins, and the
    /// first delivery's field content is kept. Returns whether a row was
    /// actually inserted.
    pub async fn insert_emergency(&self, event: &EmergencyEvent) -> Result<bool> {
        let now = chrono::Utc::now();
        let rows_affected = sqlx::query(
            "INSERT INTO emergencies (emergency_id, status, details, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             ON CONFLICT (emergency_id) DO NOTHING",
        )
        .bind(&event.emergency_id)
        .bind(Status::Active.to_string())
        .bind(serde_json::Value::Object(event.details.clone()))
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Set the status of the record matching `id`.
    ///
    /// Zero rows matched is a silent no-op, not an error; callers decide
    /// whether that outcome deserves a log line. Returns whether a row
    /// matched.
    pub async fn set_status(&self, id: &str, status: Status) -> Result<bool> {
        let rows_affected = sqlx::query(
            "UPDATE emergencies SET status = $1, updated_at = $2 WHERE emergency_id = $3",
        )
        .bind(status.to_string())
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        metrics::status_updates().add(
            1,
            &[
                KeyValue::new("status", status.to_string()),
                KeyValue::new(
                    "result",
                    if rows_affected > 0 { "updated" } else { "missing" },
                ),
            ],
        );

        Ok(rows_affected > 0)
    }

    /// List records, optionally filtered by status, newest first.
    pub async fn list_emergencies(
        &self,
        status: Option<Status>,
        limit: i64,
    ) -> Result<Vec<EmergencyRecord>> {
        let rows: Vec<EmergencyRow> = sqlx::query_as(
            "SELECT emergency_id, status, details, created_at, updated_at
             FROM emergencies
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(status.map(|s| s.to_string()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EmergencyRow::try_into_record).collect()
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct EmergencyRow {
    emergency_id: String,
    status: String,
    details: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl EmergencyRow {
    fn try_into_record(self) -> Result<EmergencyRecord> {
        let details = match self.details {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::Other(format!(
                    "emergency {} has non-object details: {other}",
                    self.emergency_id
                )));
            }
        };

        Ok(EmergencyRecord {
            emergency_id: self.emergency_id,
            status: self.status.parse()?,
            details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
