use firewatch::codec::decode;
use firewatch::error::Error;

#[test]
fn decodes_event_with_passthrough_fields() {
    let payload = br#"{"emergency_id":"E1","type":"fire","severity":3}"#;
    let event = decode(payload).unwrap();

    assert_eq!(event.emergency_id, "E1");
    assert_eq!(event.details["type"], "fire");
    assert_eq!(event.details["severity"], 3);
    // The id is lifted out of the details map, not duplicated
    assert!(!event.details.contains_key("emergency_id"));
}

#[test]
fn decodes_minimal_extinguish_payload() {
    let event = decode(br#"{"emergency_id":"E2"}"#).unwrap();
    assert_eq!(event.emergency_id, "E2");
    assert!(event.details.is_empty());
}

#[test]
fn malformed_json_is_a_decode_error() {
    let err = decode(b"{not json").unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    assert!(err.is_permanent());
}

#[test]
fn missing_emergency_id_is_a_schema_error() {
    let err = decode(br#"{"type":"fire"}"#).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "got {err:?}");
    assert!(err.is_permanent());
}

#[test]
fn non_object_payload_is_a_schema_error() {
    let err = decode(br#"["E1"]"#).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "got {err:?}");
}

#[test]
fn non_string_emergency_id_is_a_schema_error() {
    let err = decode(br#"{"emergency_id":42}"#).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "got {err:?}");
}
