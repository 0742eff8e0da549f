//! Async Preparation phase

use super::{MeetingContext, MeetingOrchestrator, RunMeetingError};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::progress::MeetingProgressNotifier;
use boardroom_domain::{MeetingPhase, MeetingPromptTemplate, PrepResult, PrepResults};
use serde_json::json;
use tracing::{debug, info, warn};

impl MeetingOrchestrator {
    /// Every participant with inference prepares independently, in list order.
    ///
    /// A failing participant is recorded and the phase carries on.
    pub(super) async fn phase_async_prep(
        &self,
        context: &MeetingContext,
        progress: &dyn MeetingProgressNotifier,
    ) -> Result<PrepResults, RunMeetingError> {
        let speakers: Vec<_> = context
            .participants
            .iter()
            .filter(|p| p.has_inference())
            .collect();
        info!(
            "Phase {}: {} participant(s) preparing",
            MeetingPhase::AsyncPrep,
            speakers.len()
        );
        progress.on_phase_start(MeetingPhase::AsyncPrep, speakers.len());

        let mut results = PrepResults::new();
        for participant in speakers {
            let prompt = MeetingPromptTemplate::preparation(
                &context.title,
                context.meeting_type,
                participant.role(),
                &context.agenda,
            );

            let result = match self.think(participant.as_ref(), &prompt).await? {
                Ok(preparation) => {
                    debug!("{} prepared ({} chars)", participant.name(), preparation.len());
                    self.logger.log(ConversationEvent::new(
                        "prep_response",
                        json!({
                            "meeting_id": context.meeting_id,
                            "participant": participant.name(),
                            "role": participant.role(),
                            "prompt": prompt,
                            "response": preparation,
                        }),
                    ));
                    participant.note(
                        &format!("Prepared for meeting: {}", context.title),
                        &context.meeting_id,
                    );
                    PrepResult::prepared(
                        participant.id(),
                        participant.role().clone(),
                        participant.name(),
                        preparation,
                    )
                }
                Err(e) => {
                    warn!("{} failed to prepare: {}", participant.name(), e);
                    self.logger.log(ConversationEvent::new(
                        "prep_failed",
                        json!({
                            "meeting_id": context.meeting_id,
                            "participant": participant.name(),
                            "role": participant.role(),
                            "error": e.to_string(),
                        }),
                    ));
                    PrepResult::failed(
                        participant.id(),
                        participant.role().clone(),
                        participant.name(),
                        e.to_string(),
                    )
                }
            };

            progress.on_turn_complete(
                MeetingPhase::AsyncPrep,
                participant.name(),
                participant.role(),
                result.is_success(),
            );
            results.insert(result);
        }

        progress.on_phase_complete(MeetingPhase::AsyncPrep);
        Ok(results)
    }
}
