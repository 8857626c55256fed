//! Core data model.
//!
//! An emergency is a real-world incident tracked by a unique string id and a
//! mutable status. Events carry the id plus arbitrary domain fields
//! (location, type, severity) the service passes through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an emergency record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Incident is ongoing. Every record starts here.
    Active,
    /// Incident has been resolved. Terminal.
    Extinguished,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Active => "active",
            Status::Extinguished => "extinguished",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Status {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "active" => Ok(Status::Active),
            "extinguished" => Ok(Status::Extinguished),
            other => Err(crate::error::Error::Other(format!(
                "unknown status: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A decoded inbound event.
///
/// `emergency_id` is the natural key; everything else in the payload lands
/// in `details` and is never interpreted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyEvent {
    pub emergency_id: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The persisted form of an emergency: the event's fields plus a status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyRecord {
    pub emergency_id: String,
    pub status: Status,
    /// Opaque domain fields carried over from the registration event.
    pub details: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
