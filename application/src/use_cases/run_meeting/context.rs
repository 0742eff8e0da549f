//! Meeting context and the table of active meetings.

use super::RunMeetingError;
use crate::ports::participant::Participant;
use boardroom_domain::{MeetingId, MeetingPhase, MeetingStatus, MeetingType};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Everything the orchestrator knows about one meeting
#[derive(Clone)]
pub struct MeetingContext {
    pub meeting_id: MeetingId,
    pub title: String,
    pub meeting_type: MeetingType,
    pub agenda: Vec<String>,
    pub participants: Vec<Arc<dyn Participant>>,
    pub status: MeetingStatus,
    pub current_phase: MeetingPhase,
}

impl MeetingContext {
    pub fn new(
        title: impl Into<String>,
        meeting_type: MeetingType,
        agenda: Vec<String>,
        participants: Vec<Arc<dyn Participant>>,
    ) -> Self {
        Self {
            meeting_id: MeetingId::generate(),
            title: title.into(),
            meeting_type,
            agenda,
            participants,
            status: MeetingStatus::Scheduled,
            current_phase: MeetingPhase::AsyncPrep,
        }
    }

    pub fn participant_names(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// The participant who synthesizes: the first CEO, else the first participant.
    pub fn facilitator(&self) -> Option<&Arc<dyn Participant>> {
        self.participants
            .iter()
            .find(|p| p.role().is_integrator())
            .or_else(|| self.participants.first())
    }
}

impl std::fmt::Debug for MeetingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeetingContext")
            .field("meeting_id", &self.meeting_id)
            .field("title", &self.title)
            .field("meeting_type", &self.meeting_type)
            .field("agenda", &self.agenda)
            .field("participants", &self.participant_names())
            .field("status", &self.status)
            .field("current_phase", &self.current_phase)
            .finish()
    }
}

struct Entry {
    context: MeetingContext,
    running: bool,
}

/// Active meetings keyed by id.
///
/// Every method takes the lock briefly and returns owned data, so callers
/// never hold it across an `.await`.
#[derive(Default)]
pub struct ActiveMeetings {
    entries: Mutex<HashMap<MeetingId, Entry>>,
}

impl ActiveMeetings {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MeetingId, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, context: MeetingContext) {
        self.lock().insert(
            context.meeting_id.clone(),
            Entry {
                context,
                running: false,
            },
        );
    }

    pub fn get(&self, id: &MeetingId) -> Option<MeetingContext> {
        self.lock().get(id).map(|e| e.context.clone())
    }

    /// Meetings that have not completed, in no particular order.
    pub fn active(&self) -> Vec<MeetingContext> {
        self.lock()
            .values()
            .filter(|e| e.context.status != MeetingStatus::Completed)
            .map(|e| e.context.clone())
            .collect()
    }

    /// Mark a meeting as running and return its snapshot.
    ///
    /// The flag stays set until the returned guard is finished or dropped.
    pub fn begin_run(
        &self,
        id: &MeetingId,
    ) -> Result<(MeetingContext, RunGuard<'_>), RunMeetingError> {
        let mut entries = self.lock();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RunMeetingError::MeetingNotFound(id.clone()))?;
        if entry.running {
            return Err(RunMeetingError::MeetingAlreadyRunning(id.clone()));
        }
        entry.running = true;
        entry.context.status = MeetingStatus::InProgress;
        entry.context.current_phase = MeetingPhase::AsyncPrep;
        let guard = RunGuard {
            meetings: self,
            id: id.clone(),
            finished: false,
        };
        Ok((entry.context.clone(), guard))
    }

    pub fn set_phase(&self, id: &MeetingId, phase: MeetingPhase) {
        if let Some(entry) = self.lock().get_mut(id) {
            entry.context.current_phase = phase;
        }
    }

    fn end_run(&self, id: &MeetingId, status: MeetingStatus) {
        if let Some(entry) = self.lock().get_mut(id) {
            entry.running = false;
            entry.context.status = status;
            if status == MeetingStatus::Completed {
                entry.context.current_phase = MeetingPhase::Completed;
            }
        }
    }
}

/// Running flag of one meeting.
///
/// Dropping it without [`RunGuard::finish`] (an aborted task, a caller-side
/// timeout) releases the meeting as `Cancelled`.
#[must_use = "dropping the guard ends the run immediately"]
pub struct RunGuard<'a> {
    meetings: &'a ActiveMeetings,
    id: MeetingId,
    finished: bool,
}

impl RunGuard<'_> {
    /// Release the meeting with its final status.
    pub fn finish(mut self, status: MeetingStatus) {
        self.meetings.end_run(&self.id, status);
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Run of meeting {} dropped before finishing", self.id);
            self.meetings.end_run(&self.id, MeetingStatus::Cancelled);
        }
    }
}
