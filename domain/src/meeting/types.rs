//! Meeting enums: type, status, phase, and participant role.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Kind of meeting being held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    ExecutiveReview,
    BoardReview,
    DecisionMeeting,
    TeamCheckin,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::ExecutiveReview => "executive_review",
            MeetingType::BoardReview => "board_review",
            MeetingType::DecisionMeeting => "decision_meeting",
            MeetingType::TeamCheckin => "team_checkin",
        }
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeetingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "executive_review" => Ok(MeetingType::ExecutiveReview),
            "board_review" => Ok(MeetingType::BoardReview),
            "decision_meeting" => Ok(MeetingType::DecisionMeeting),
            "team_checkin" => Ok(MeetingType::TeamCheckin),
            _ => Err(DomainError::UnknownMeetingType(s.to_string())),
        }
    }
}

/// Lifecycle status of a meeting
///
/// `Paused` has no transition into it yet; `Cancelled` is entered when a
/// run is aborted through its cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::InProgress => "in_progress",
            MeetingStatus::Paused => "paused",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a meeting run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingPhase {
    /// Participants prepare independently
    AsyncPrep,
    /// Round-robin discussion followed by facilitator synthesis
    SyncDecision,
    Completed,
}

impl MeetingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingPhase::AsyncPrep => "async_prep",
            MeetingPhase::SyncDecision => "sync_decision",
            MeetingPhase::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeetingPhase::AsyncPrep => "Async Preparation",
            MeetingPhase::SyncDecision => "Sync Decision",
            MeetingPhase::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for MeetingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Organizational role of a meeting participant.
///
/// `Ceo` is the integrator role: the first CEO in the participant list
/// facilitates the synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "BOD")]
    Board,
    Strategy,
    Product,
    Engineering,
    #[serde(untagged)]
    Custom(String),
}

impl ParticipantRole {
    pub fn as_str(&self) -> &str {
        match self {
            ParticipantRole::Ceo => "CEO",
            ParticipantRole::Board => "BOD",
            ParticipantRole::Strategy => "Strategy",
            ParticipantRole::Product => "Product",
            ParticipantRole::Engineering => "Engineering",
            ParticipantRole::Custom(s) => s,
        }
    }

    /// Whether this role synthesizes the meeting outcome.
    pub fn is_integrator(&self) -> bool {
        matches!(self, ParticipantRole::Ceo)
    }

    /// Name used when an agent is created without one.
    pub fn default_name(&self) -> String {
        match self {
            ParticipantRole::Ceo => "CEO".to_string(),
            ParticipantRole::Board => "Board of Directors".to_string(),
            ParticipantRole::Strategy => "Strategy Expert".to_string(),
            ParticipantRole::Product => "Product Expert".to_string(),
            ParticipantRole::Engineering => "Engineering Expert".to_string(),
            ParticipantRole::Custom(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParticipantRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "ceo" => ParticipantRole::Ceo,
            "bod" | "board" => ParticipantRole::Board,
            "strategy" => ParticipantRole::Strategy,
            "product" => ParticipantRole::Product,
            "engineering" => ParticipantRole::Engineering,
            _ => ParticipantRole::Custom(s.to_string()),
        })
    }
}
