//! Workspace summary across all stored artifacts

use crate::ports::artifact_store::{ArtifactStore, ArtifactStoreError};
use boardroom_domain::{ActionItem, ArtifactKind, Decision, MeetingLog};
use serde::Serialize;

/// Counts of meetings, decisions and action items in a workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceSummary {
    pub meetings: usize,
    pub completed_meetings: usize,
    pub decisions: usize,
    pub pending_decisions: usize,
    pub action_items: usize,
    pub open_action_items: usize,
}

impl WorkspaceSummary {
    /// Tally every artifact in the store. Records that fail to parse are not counted.
    pub fn collect(store: &dyn ArtifactStore) -> Result<Self, ArtifactStoreError> {
        let meetings: Vec<MeetingLog> = store.list_records(ArtifactKind::Meeting)?;
        let decisions: Vec<Decision> = store.list_records(ArtifactKind::Decision)?;
        let action_items: Vec<ActionItem> = store.list_records(ArtifactKind::ActionItem)?;

        Ok(Self {
            meetings: meetings.len(),
            completed_meetings: meetings.iter().filter(|m| m.is_completed()).count(),
            decisions: decisions.len(),
            pending_decisions: decisions.iter().filter(|d| d.is_pending()).count(),
            action_items: action_items.len(),
            open_action_items: action_items.iter().filter(|a| a.is_open()).count(),
        })
    }
}
