//! Streaming events for provider responses.
//!
//! [`StreamEvent`] represents individual events in a streamed completion,
//! enabling real-time display of model output as it's generated.
//!
//! # Failover and partial output
//!
//! When a provider fails mid-stream and the invoker switches to the next
//! provider, the new stream starts from the beginning. Deltas already
//! delivered belong to the abandoned attempt; a [`StreamEvent::Restarted`]
//! marker separates them from the new attempt so callers can discard or
//! keep them as they see fit. `Completed` only ever carries the text of the
//! provider that finished.

/// An event in a streamed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk from the current provider.
    Delta(String),
    /// The previous attempt failed; output restarts from `provider`.
    Restarted {
        /// Display name of the provider now streaming
        provider: String,
        /// Why the previous attempt was abandoned
        reason: String,
    },
    /// The complete text of the successful attempt (signals stream end).
    Completed(String),
    /// Every candidate failed (signals stream end).
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}
