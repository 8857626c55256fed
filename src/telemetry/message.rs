//! Message handling span helpers.
//!
//! One span per inbound queue message, wrapping decode, routing, and
//! acknowledgment.

use tracing::Span;

/// Start a span for handling one queue message.
pub fn start_message_span(queue: &str, msg_id: i64) -> Span {
    tracing::info_span!(
        "message.handle",
        "message.queue" = queue,
        "message.id" = msg_id,
    )
}
