//! Sync Decision phase
//!
//! Two round-robin rounds over a shared, growing context, then the
//! facilitator synthesizes and the synthesis is parsed for outcomes.

use super::{MeetingContext, MeetingOrchestrator, RunMeetingError};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::progress::MeetingProgressNotifier;
use boardroom_domain::{
    DISCUSSION_ROUNDS, DecisionPhaseResult, DiscussionEntry, MeetingPhase, MeetingPromptTemplate,
    PrepResults, parse_synthesis,
};
use serde_json::json;
use tracing::{debug, info, warn};

impl MeetingOrchestrator {
    pub(super) async fn phase_sync_decision(
        &self,
        context: &MeetingContext,
        prep_results: &PrepResults,
        progress: &dyn MeetingProgressNotifier,
    ) -> Result<DecisionPhaseResult, RunMeetingError> {
        let speakers: Vec<_> = context
            .participants
            .iter()
            .filter(|p| p.has_inference())
            .collect();
        info!(
            "Phase {}: {} round(s) with {} speaker(s)",
            MeetingPhase::SyncDecision,
            DISCUSSION_ROUNDS,
            speakers.len()
        );
        progress.on_phase_start(
            MeetingPhase::SyncDecision,
            speakers.len() * DISCUSSION_ROUNDS as usize,
        );

        let mut shared = MeetingPromptTemplate::discussion_header(&context.title);
        for prep in prep_results.successful() {
            if let Some(text) = prep.preparation_text() {
                shared.push_str(&MeetingPromptTemplate::preparation_block(
                    &prep.name, &prep.role, text,
                ));
            }
        }

        let mut result = DecisionPhaseResult::default();

        for round in 1..=DISCUSSION_ROUNDS {
            debug!("Discussion round {}", round);
            progress.on_round_start(round);

            for participant in &speakers {
                let prompt = MeetingPromptTemplate::discussion(
                    &context.title,
                    participant.role(),
                    round,
                    &shared,
                );

                let success = match self.think(participant.as_ref(), &prompt).await? {
                    Ok(response) => {
                        shared.push_str(&MeetingPromptTemplate::discussion_turn(
                            participant.name(),
                            &response,
                        ));
                        self.logger.log(ConversationEvent::new(
                            "discussion_turn",
                            json!({
                                "meeting_id": context.meeting_id,
                                "round": round,
                                "participant": participant.name(),
                                "role": participant.role(),
                                "response": response,
                            }),
                        ));
                        result.discussion_log.push(DiscussionEntry::new(
                            participant.id(),
                            participant.role().clone(),
                            response,
                            round,
                        ));
                        participant.note(
                            &format!("Spoke in meeting round {}", round),
                            &context.meeting_id,
                        );
                        true
                    }
                    Err(e) => {
                        warn!(
                            "{} failed in round {}: {}",
                            participant.name(),
                            round,
                            e
                        );
                        shared.push_str(&MeetingPromptTemplate::discussion_turn_failed(
                            participant.name(),
                            &e.to_string(),
                        ));
                        self.logger.log(ConversationEvent::new(
                            "discussion_turn_failed",
                            json!({
                                "meeting_id": context.meeting_id,
                                "round": round,
                                "participant": participant.name(),
                                "role": participant.role(),
                                "error": e.to_string(),
                            }),
                        ));
                        false
                    }
                };

                progress.on_turn_complete(
                    MeetingPhase::SyncDecision,
                    participant.name(),
                    participant.role(),
                    success,
                );
            }
        }

        self.synthesize(context, &shared, &mut result, progress)
            .await?;

        progress.on_phase_complete(MeetingPhase::SyncDecision);
        Ok(result)
    }

    /// Ask the facilitator to synthesize the discussion.
    ///
    /// A facilitator failure leaves the result without decisions and records
    /// why in `synthesis_error`.
    async fn synthesize(
        &self,
        context: &MeetingContext,
        shared: &str,
        result: &mut DecisionPhaseResult,
        progress: &dyn MeetingProgressNotifier,
    ) -> Result<(), RunMeetingError> {
        let Some(facilitator) = context.facilitator() else {
            result.synthesis_error = Some("meeting has no participants".to_string());
            return Ok(());
        };
        if !facilitator.has_inference() {
            warn!(
                "Facilitator {} has no inference; skipping synthesis",
                facilitator.name()
            );
            result.synthesis_error = Some(format!(
                "{} has no inference backend configured",
                facilitator.name()
            ));
            return Ok(());
        }

        progress.on_synthesis_start(facilitator.name());
        let prompt = MeetingPromptTemplate::synthesis(&context.title, &context.agenda, shared);

        match self.think(facilitator.as_ref(), &prompt).await? {
            Ok(synthesis) => {
                let parsed = parse_synthesis(&synthesis);
                info!(
                    "Synthesis by {}: {} decision(s), {} action item(s)",
                    facilitator.name(),
                    parsed.decisions.len(),
                    parsed.action_items.len()
                );
                self.logger.log(ConversationEvent::new(
                    "synthesis",
                    json!({
                        "meeting_id": context.meeting_id,
                        "facilitator": facilitator.name(),
                        "synthesis": synthesis,
                        "decisions": parsed.decisions.len(),
                        "action_items": parsed.action_items.len(),
                    }),
                ));
                result.decisions = parsed.decisions;
                result.action_items = parsed.action_items;
                result.synthesis = Some(synthesis);
                progress.on_synthesis_complete(true);
            }
            Err(e) => {
                warn!("Synthesis by {} failed: {}", facilitator.name(), e);
                self.logger.log(ConversationEvent::new(
                    "synthesis_failed",
                    json!({
                        "meeting_id": context.meeting_id,
                        "facilitator": facilitator.name(),
                        "error": e.to_string(),
                    }),
                ));
                result.synthesis_error = Some(e.to_string());
                progress.on_synthesis_complete(false);
            }
        }
        Ok(())
    }
}
