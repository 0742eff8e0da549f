//! Meeting value objects - immutable result types for each phase.
//!
//! - [`PrepResult`] - one participant's output from Async Preparation
//! - [`DiscussionEntry`] - one successful turn in the Sync Decision rounds
//! - [`ExtractedDecision`] / [`ExtractedActionItem`] - parsed from the synthesis
//! - [`MeetingResult`] - complete result containing all phases

use super::types::{MeetingStatus, ParticipantRole};
use crate::core::id::{MeetingId, short_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a participant's preparation.
///
/// Preparation text and error message are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepOutcome {
    Prepared(String),
    Failed(String),
}

/// Result of one participant's Async Preparation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepResult {
    pub participant_id: String,
    pub role: ParticipantRole,
    pub name: String,
    pub outcome: PrepOutcome,
}

impl PrepResult {
    pub fn prepared(
        participant_id: impl Into<String>,
        role: ParticipantRole,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            role,
            name: name.into(),
            outcome: PrepOutcome::Prepared(text.into()),
        }
    }

    pub fn failed(
        participant_id: impl Into<String>,
        role: ParticipantRole,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            role,
            name: name.into(),
            outcome: PrepOutcome::Failed(error.into()),
        }
    }

    pub fn preparation_text(&self) -> Option<&str> {
        match &self.outcome {
            PrepOutcome::Prepared(text) => Some(text),
            PrepOutcome::Failed(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            PrepOutcome::Failed(error) => Some(error),
            PrepOutcome::Prepared(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PrepOutcome::Prepared(_))
    }
}

/// Prep results keyed by participant id, in participant order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrepResults(Vec<PrepResult>);

impl PrepResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, replacing any earlier result for the same participant.
    pub fn insert(&mut self, result: PrepResult) {
        match self
            .0
            .iter_mut()
            .find(|r| r.participant_id == result.participant_id)
        {
            Some(existing) => *existing = result,
            None => self.0.push(result),
        }
    }

    pub fn get(&self, participant_id: &str) -> Option<&PrepResult> {
        self.0.iter().find(|r| r.participant_id == participant_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrepResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn successful(&self) -> impl Iterator<Item = &PrepResult> {
        self.0.iter().filter(|r| r.is_success())
    }
}

/// One successful contribution to the Sync Decision discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionEntry {
    pub participant_id: String,
    pub role: ParticipantRole,
    pub content: String,
    /// 1-based discussion round
    pub round: u8,
    pub timestamp: DateTime<Utc>,
}

impl DiscussionEntry {
    pub fn new(
        participant_id: impl Into<String>,
        role: ParticipantRole,
        content: impl Into<String>,
        round: u8,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            role,
            content: content.into(),
            round,
            timestamp: Utc::now(),
        }
    }
}

/// Status of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Proposed,
    Approved,
    Rejected,
    Pending,
}

/// Status of an action item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionItemStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
}

/// A decision parsed out of the facilitator's synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDecision {
    pub id: String,
    pub description: String,
    pub status: DecisionStatus,
}

impl ExtractedDecision {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            description: description.into(),
            status: DecisionStatus::Proposed,
        }
    }
}

/// Placeholder for an unspecified owner or deadline
pub const UNSPECIFIED: &str = "TBD";

/// An action item parsed out of the facilitator's synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedActionItem {
    pub id: String,
    pub description: String,
    pub owner: String,
    pub deadline: String,
    pub status: ActionItemStatus,
}

impl ExtractedActionItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            description: description.into(),
            owner: UNSPECIFIED.to_string(),
            deadline: UNSPECIFIED.to_string(),
            status: ActionItemStatus::Todo,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = non_empty_or_unspecified(owner.into());
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = non_empty_or_unspecified(deadline.into());
        self
    }
}

fn non_empty_or_unspecified(value: String) -> String {
    if value.trim().is_empty() {
        UNSPECIFIED.to_string()
    } else {
        value
    }
}

/// Output of the Sync Decision phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPhaseResult {
    pub discussion_log: Vec<DiscussionEntry>,
    pub decisions: Vec<ExtractedDecision>,
    pub action_items: Vec<ExtractedActionItem>,
    /// Raw facilitator synthesis, if one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,
    /// Why no synthesis was produced, if the facilitator failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis_error: Option<String>,
}

/// Complete result of a meeting run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingResult {
    pub meeting_id: MeetingId,
    pub title: String,
    pub prep_results: PrepResults,
    pub discussion_log: Vec<DiscussionEntry>,
    pub decisions: Vec<ExtractedDecision>,
    pub action_items: Vec<ExtractedActionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis_error: Option<String>,
    pub status: MeetingStatus,
}

impl MeetingResult {
    /// Assemble the final result from both phases.
    pub fn completed(
        meeting_id: MeetingId,
        title: impl Into<String>,
        prep_results: PrepResults,
        decision: DecisionPhaseResult,
    ) -> Self {
        Self {
            meeting_id,
            title: title.into(),
            prep_results,
            discussion_log: decision.discussion_log,
            decisions: decision.decisions,
            action_items: decision.action_items,
            synthesis: decision.synthesis,
            synthesis_error: decision.synthesis_error,
            status: MeetingStatus::Completed,
        }
    }

    /// Returns an iterator over the participants whose preparation failed.
    pub fn failed_preparations(&self) -> impl Iterator<Item = &PrepResult> {
        self.prep_results.iter().filter(|r| !r.is_success())
    }
}
