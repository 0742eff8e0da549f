//! Agent thoughts - a running record of what an agent has done.

use crate::core::id::MeetingId;
use crate::meeting::types::ParticipantRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded step of an agent's work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentThought {
    pub agent_id: String,
    pub role: ParticipantRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<MeetingId>,
    pub timestamp: DateTime<Utc>,
}

impl AgentThought {
    pub fn new(
        agent_id: impl Into<String>,
        role: ParticipantRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            role,
            content: content.into(),
            meeting_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn in_meeting(mut self, meeting_id: MeetingId) -> Self {
        self.meeting_id = Some(meeting_id);
        self
    }
}
