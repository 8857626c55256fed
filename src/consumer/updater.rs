//! Status updater: transitions an incident's status to extinguished.

use crate::db::Db;
use crate::error::Result;
use crate::model::{EmergencyEvent, Status};
use tracing::{info, warn};

/// Handle an extinguish event.
///
/// Unconditional update: no check of the prior status, so re-delivery and
/// already-extinguished records are no-ops. An id with no record is a
/// no-op too — no record is ever created here — but it is logged since it
/// usually means the events arrived out of order or the registration was
/// lost.
pub async fn handle(db: &Db, event: EmergencyEvent) -> Result<()> {
    let updated = db
        .set_status(&event.emergency_id, Status::Extinguished)
        .await?;

    if updated {
        info!(emergency_id = %event.emergency_id, "emergency extinguished");
    } else {
        warn!(emergency_id = %event.emergency_id, "extinguish for unknown emergency, ignored");
    }

    Ok(())
}
