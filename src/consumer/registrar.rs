//! Emergency registrar: inserts new incident records, deduplicating by id.

use crate::db::Db;
use crate::error::Result;
use crate::model::EmergencyEvent;
use crate::telemetry::metrics;
use opentelemetry::KeyValue;
use tracing::{debug, info};

/// Handle a registration event.
///
/// Delivering the same event once or N times yields exactly one stored
/// record: the insert is conditional on the id being absent, and a
/// duplicate delivery changes nothing (the first delivery's field content
/// is kept).
pub async fn handle(db: &Db, event: EmergencyEvent) -> Result<()> {
    let inserted = db.insert_emergency(&event).await?;

    if inserted {
        info!(emergency_id = %event.emergency_id, "emergency registered");
    } else {
        debug!(emergency_id = %event.emergency_id, "duplicate registration ignored");
    }

    metrics::registrations().add(
        1,
        &[KeyValue::new(
            "result",
            if inserted { "created" } else { "duplicate" },
        )],
    );

    Ok(())
}
