//! Meeting transcript port.
//!
//! `tracing` carries diagnostics; this port carries the record of what was
//! said. The orchestrator emits one [`ConversationEvent`] per prompt,
//! reply, failure and synthesis, and an adapter decides where it lands.

use serde_json::Value;

/// One transcript entry: a kind tag plus whatever fields that kind needs.
pub struct ConversationEvent {
    /// `prep_response`, `discussion_turn`, `synthesis`, ...
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript entries.
///
/// Recording never fails the meeting; adapters swallow their own I/O
/// errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards everything. The orchestrator's default.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
