//! Event decoding. Pure, stateless.
//!
//! Distinguishes two failure classes: `Error::Decode` when the bytes are not
//! a JSON object at all, `Error::Schema` when the object lacks the required
//! `emergency_id` key. No validation beyond that.

use crate::error::{Error, Result};
use crate::model::EmergencyEvent;

/// Decode a raw queue payload into an [`EmergencyEvent`].
pub fn decode(bytes: &[u8]) -> Result<EmergencyEvent> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    decode_value(value)
}

/// Decode an already-parsed JSON value (pgmq hands payloads over as
/// `serde_json::Value`, so the dispatch loop enters here).
pub fn decode_value(value: serde_json::Value) -> Result<EmergencyEvent> {
    let serde_json::Value::Object(mut fields) = value else {
        return Err(Error::Schema("payload is not a JSON object".to_string()));
    };

    let emergency_id = match fields.remove("emergency_id") {
        Some(serde_json::Value::String(id)) => id,
        Some(_) => {
            return Err(Error::Schema("emergency_id is not a string".to_string()));
        }
        None => {
            return Err(Error::Schema(
                "missing required field emergency_id".to_string(),
            ));
        }
    };

    Ok(EmergencyEvent {
        emergency_id,
        details: fields,
    })
}
