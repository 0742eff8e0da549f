//! Durable meeting artifacts.
//!
//! These are the records the artifact store persists: one [`MeetingLog`] per
//! meeting plus one [`Decision`] and one [`ActionItem`] per extracted item.

use super::types::{MeetingPhase, MeetingType};
use super::value_objects::{
    ActionItemStatus, DecisionStatus, DiscussionEntry, ExtractedActionItem, ExtractedDecision,
};
use crate::core::id::MeetingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of a decision title.
pub const DECISION_TITLE_LEN: usize = 50;

/// Artifact categories, each stored in its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Meeting,
    Decision,
    ActionItem,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Meeting,
        ArtifactKind::Decision,
        ArtifactKind::ActionItem,
    ];

    /// Directory name under the artifacts root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactKind::Meeting => "meetings",
            ArtifactKind::Decision => "decisions",
            ArtifactKind::ActionItem => "action_items",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "meeting" | "meetings" => Ok(ArtifactKind::Meeting),
            "decision" | "decisions" => Ok(ArtifactKind::Decision),
            "action_item" | "action_items" => Ok(ArtifactKind::ActionItem),
            _ => Err(format!(
                "unknown artifact kind '{}' (expected meetings, decisions or action-items)",
                s
            )),
        }
    }
}

/// Persistent log of a meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingLog {
    pub id: MeetingId,
    pub meeting_type: MeetingType,
    pub title: String,
    #[serde(default)]
    pub agenda: Vec<String>,
    /// Participant display names
    #[serde(default)]
    pub participants: Vec<String>,
    pub phase: MeetingPhase,
    /// Decision ids
    #[serde(default)]
    pub decisions: Vec<String>,
    /// Action item ids
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub discussion_summary: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl MeetingLog {
    pub fn new(
        id: MeetingId,
        meeting_type: MeetingType,
        title: impl Into<String>,
        agenda: Vec<String>,
        participants: Vec<String>,
    ) -> Self {
        Self {
            id,
            meeting_type,
            title: title.into(),
            agenda,
            participants,
            phase: MeetingPhase::AsyncPrep,
            decisions: Vec::new(),
            action_items: Vec::new(),
            discussion_summary: String::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record the outcome of a finished run.
    pub fn complete(
        &mut self,
        decisions: &[ExtractedDecision],
        action_items: &[ExtractedActionItem],
        discussion_log: &[DiscussionEntry],
    ) {
        self.phase = MeetingPhase::Completed;
        self.decisions = decisions.iter().map(|d| d.id.clone()).collect();
        self.action_items = action_items.iter().map(|a| a.id.clone()).collect();
        self.discussion_summary = summarize_discussion(discussion_log);
        self.completed_at = Some(Utc::now());
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A decision recorded by a meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rationale: String,
    pub status: DecisionStatus,
    pub proposed_by: String,
    #[serde(default)]
    pub meeting_id: Option<MeetingId>,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    pub fn from_meeting(extracted: &ExtractedDecision, meeting_id: &MeetingId) -> Self {
        Self {
            id: extracted.id.clone(),
            title: extracted
                .description
                .chars()
                .take(DECISION_TITLE_LEN)
                .collect(),
            description: extracted.description.clone(),
            rationale: "Discussed and decided in meeting".to_string(),
            status: extracted.status,
            proposed_by: "meeting".to_string(),
            meeting_id: Some(meeting_id.clone()),
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            DecisionStatus::Proposed | DecisionStatus::Pending
        )
    }
}

/// An action item recorded by a meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub description: String,
    pub owner: String,
    pub deadline: String,
    pub status: ActionItemStatus,
    pub meeting_id: MeetingId,
    pub created_at: DateTime<Utc>,
}

impl ActionItem {
    pub fn from_meeting(extracted: &ExtractedActionItem, meeting_id: &MeetingId) -> Self {
        Self {
            id: extracted.id.clone(),
            description: extracted.description.clone(),
            owner: extracted.owner.clone(),
            deadline: extracted.deadline.clone(),
            status: extracted.status,
            meeting_id: meeting_id.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            ActionItemStatus::Todo | ActionItemStatus::InProgress
        )
    }
}

/// Summarize who spoke, counting contributions per role in first-seen order.
pub fn summarize_discussion(discussion_log: &[DiscussionEntry]) -> String {
    if discussion_log.is_empty() {
        return "No discussion recorded".to_string();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in discussion_log {
        let role = entry.role.as_str();
        match counts.iter_mut().find(|(r, _)| *r == role) {
            Some((_, n)) => *n += 1,
            None => counts.push((role, 1)),
        }
    }

    let parts: Vec<String> = counts
        .iter()
        .map(|(role, n)| format!("{} ({} contributions)", role, n))
        .collect();
    format!("Discussion involved: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::types::ParticipantRole;

    #[test]
    fn summary_counts_by_role_in_order() {
        let log = vec![
            DiscussionEntry::new("a", ParticipantRole::Ceo, "x", 1),
            DiscussionEntry::new("b", ParticipantRole::Product, "y", 1),
            DiscussionEntry::new("a", ParticipantRole::Ceo, "z", 2),
        ];
        assert_eq!(
            summarize_discussion(&log),
            "Discussion involved: CEO (2 contributions), Product (1 contributions)"
        );
    }

    #[test]
    fn summary_of_empty_discussion() {
        assert_eq!(summarize_discussion(&[]), "No discussion recorded");
    }

    #[test]
    fn decision_title_is_truncated_by_chars() {
        let long = "é".repeat(80);
        let decision = Decision::from_meeting(&ExtractedDecision::new(long), &MeetingId::from("m"));
        assert_eq!(decision.title.chars().count(), DECISION_TITLE_LEN);
        assert_eq!(decision.proposed_by, "meeting");
        assert!(decision.is_pending());
    }

    #[test]
    fn completing_log_records_ids() {
        let mut log = MeetingLog::new(
            MeetingId::from("m1"),
            MeetingType::DecisionMeeting,
            "Pricing",
            vec!["Price".to_string()],
            vec!["CEO".to_string()],
        );
        assert!(!log.is_completed());

        let decision = ExtractedDecision::new("Raise");
        let action = ExtractedActionItem::new("Email");
        log.complete(&[decision.clone()], &[action.clone()], &[]);

        assert_eq!(log.phase, MeetingPhase::Completed);
        assert_eq!(log.decisions, vec![decision.id]);
        assert_eq!(log.action_items, vec![action.id]);
        assert_eq!(log.discussion_summary, "No discussion recorded");
        assert!(log.is_completed());
    }

    #[test]
    fn artifact_kind_parses_cli_names() {
        assert_eq!("action-items".parse::<ArtifactKind>().unwrap(), ArtifactKind::ActionItem);
        assert_eq!("meetings".parse::<ArtifactKind>().unwrap(), ArtifactKind::Meeting);
        assert!("initiatives".parse::<ArtifactKind>().is_err());
        assert_eq!(ArtifactKind::Decision.dir_name(), "decisions");
    }

    #[test]
    fn open_action_items() {
        let mut item = ActionItem::from_meeting(
            &ExtractedActionItem::new("Email"),
            &MeetingId::from("m"),
        );
        assert!(item.is_open());
        item.status = ActionItemStatus::Done;
        assert!(!item.is_open());
    }
}
