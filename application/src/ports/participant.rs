//! Participant port
//!
//! Anything that can take part in a meeting: produce text from a prompt.

use async_trait::async_trait;
use boardroom_domain::{AgentAction, MeetingId, ParticipantRole};
use thiserror::Error;

use crate::use_cases::invoke::InvokeError;

/// Errors a participant can raise
#[derive(Error, Debug)]
pub enum ParticipantError {
    #[error("{name} has no inference backend configured")]
    NoInference { name: String },

    #[error("{role} cannot perform action '{action}'")]
    ActionNotSupported {
        role: ParticipantRole,
        action: &'static str,
    },

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl ParticipantError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ParticipantError::Invoke(InvokeError::Cancelled))
    }
}

/// A meeting participant
#[async_trait]
pub trait Participant: Send + Sync {
    fn id(&self) -> &str;

    fn role(&self) -> &ParticipantRole;

    fn name(&self) -> &str;

    /// Participants without inference are skipped by every meeting phase.
    fn has_inference(&self) -> bool {
        true
    }

    /// Produce a response to a prompt.
    async fn think(&self, prompt: &str) -> Result<String, ParticipantError>;

    /// Record something the participant did in a meeting.
    fn note(&self, _content: &str, _meeting_id: &MeetingId) {}

    /// Whether this participant can perform the given action.
    fn supports(&self, action: &AgentAction) -> bool {
        &action.role() == self.role()
    }
}
