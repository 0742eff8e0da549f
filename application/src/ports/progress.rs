//! Progress notification port
//!
//! Defines the interface for reporting progress during a meeting run.

use boardroom_domain::{MeetingPhase, ParticipantRole};

/// Callback for progress updates during a meeting run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, log lines, etc.)
pub trait MeetingProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: MeetingPhase, total_turns: usize);

    /// Called when a participant's turn completes within a phase
    fn on_turn_complete(&self, phase: MeetingPhase, name: &str, role: &ParticipantRole, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: MeetingPhase);

    /// Called when the discussion moves to a new round (1-based)
    fn on_round_start(&self, _round: u8) {}

    /// Called before the facilitator synthesizes
    fn on_synthesis_start(&self, _facilitator: &str) {}

    /// Called after the synthesis attempt
    fn on_synthesis_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl MeetingProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: MeetingPhase, _total_turns: usize) {}
    fn on_turn_complete(
        &self,
        _phase: MeetingPhase,
        _name: &str,
        _role: &ParticipantRole,
        _success: bool,
    ) {
    }
    fn on_phase_complete(&self, _phase: MeetingPhase) {}
}
