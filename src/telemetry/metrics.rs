//! Metric instrument factories for firewatch.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"firewatch"` meter.

use opentelemetry::metrics::{Counter, Meter};

/// Returns the shared meter for firewatch instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("firewatch")
}

/// Counter: queue-level operations (declare, publish, read, ack).
/// Labels: `queue`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("firewatch.queue.operations")
        .with_description("Number of queue operations")
        .build()
}

/// Counter: registration events handled.
/// Labels: `result` ("created" | "duplicate").
pub fn registrations() -> Counter<u64> {
    meter()
        .u64_counter("firewatch.registrations")
        .with_description("Number of registration events handled")
        .build()
}

/// Counter: status updates applied to the store.
/// Labels: `status`, `result` ("updated" | "missing").
pub fn status_updates() -> Counter<u64> {
    meter()
        .u64_counter("firewatch.status_updates")
        .with_description("Number of status update attempts")
        .build()
}

/// Counter: messages dropped because their payload could not be decoded.
/// Labels: `queue`.
pub fn decode_failures() -> Counter<u64> {
    meter()
        .u64_counter("firewatch.decode_failures")
        .with_description("Number of permanently malformed messages dropped")
        .build()
}
