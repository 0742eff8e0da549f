//! Run Meeting use case
//!
//! Orchestrates a meeting from creation to persisted outcomes:
//!
//! 1. **Async Preparation** ([`prep`]): each participant prepares alone
//! 2. **Sync Decision** ([`decision`]): two discussion rounds, then synthesis
//! 3. Persistence: the meeting log is completed and every extracted
//!    decision and action item is saved as its own artifact

mod context;
mod decision;
mod prep;

pub use context::{ActiveMeetings, MeetingContext, RunGuard};

use crate::ports::artifact_store::{ArtifactStore, ArtifactStoreError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::participant::{Participant, ParticipantError};
use crate::ports::progress::{MeetingProgressNotifier, NoProgress};
use boardroom_domain::{
    ActionItem, ArtifactKind, Decision, DecisionPhaseResult, MeetingId, MeetingLog, MeetingPhase,
    MeetingResult, MeetingStatus, MeetingType,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur while running a meeting
#[derive(Error, Debug)]
pub enum RunMeetingError {
    #[error("Meeting {0} not found")]
    MeetingNotFound(MeetingId),

    #[error("Meeting {0} is already running")]
    MeetingAlreadyRunning(MeetingId),

    #[error("Meeting cancelled")]
    Cancelled,

    #[error("Artifact store error: {0}")]
    Store(#[from] ArtifactStoreError),
}

/// Creates meetings and runs them through both phases
pub struct MeetingOrchestrator {
    store: Arc<dyn ArtifactStore>,
    meetings: ActiveMeetings,
    logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl MeetingOrchestrator {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            meetings: ActiveMeetings::new(),
            logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    /// Write the meeting transcript through this logger.
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Register a new meeting and persist its initial log.
    pub fn create_meeting(
        &self,
        title: impl Into<String>,
        meeting_type: MeetingType,
        agenda: Vec<String>,
        participants: Vec<Arc<dyn Participant>>,
    ) -> Result<MeetingContext, RunMeetingError> {
        let context = MeetingContext::new(title, meeting_type, agenda, participants);
        let log = MeetingLog::new(
            context.meeting_id.clone(),
            context.meeting_type,
            &context.title,
            context.agenda.clone(),
            context.participant_names(),
        );
        self.store
            .save_record(ArtifactKind::Meeting, context.meeting_id.as_str(), &log)?;

        info!(
            "Created meeting {} \"{}\" with {} participant(s)",
            context.meeting_id,
            context.title,
            context.participants.len()
        );
        self.meetings.insert(context.clone());
        Ok(context)
    }

    pub fn get_meeting(&self, meeting_id: &MeetingId) -> Option<MeetingContext> {
        self.meetings.get(meeting_id)
    }

    /// Meetings that have not completed yet.
    pub fn list_active_meetings(&self) -> Vec<MeetingContext> {
        self.meetings.active()
    }

    /// Run a meeting with default (no-op) progress
    pub async fn run_meeting(
        &self,
        meeting_id: &MeetingId,
    ) -> Result<MeetingResult, RunMeetingError> {
        self.run_meeting_with_progress(meeting_id, &NoProgress)
            .await
    }

    /// Run a meeting with progress callbacks
    pub async fn run_meeting_with_progress(
        &self,
        meeting_id: &MeetingId,
        progress: &dyn MeetingProgressNotifier,
    ) -> Result<MeetingResult, RunMeetingError> {
        let (context, run) = self.meetings.begin_run(meeting_id)?;
        info!("Running meeting {} \"{}\"", context.meeting_id, context.title);
        self.logger.log(ConversationEvent::new(
            "meeting_started",
            json!({
                "meeting_id": context.meeting_id,
                "title": context.title,
                "meeting_type": context.meeting_type,
                "agenda": context.agenda,
                "participants": context.participant_names(),
            }),
        ));

        let outcome = self.run_phases(&context, progress).await;
        match &outcome {
            Ok(result) => {
                run.finish(MeetingStatus::Completed);
                self.logger.log(ConversationEvent::new(
                    "meeting_completed",
                    json!({
                        "meeting_id": result.meeting_id,
                        "decisions": result.decisions.len(),
                        "action_items": result.action_items.len(),
                    }),
                ));
            }
            Err(RunMeetingError::Cancelled) => {
                warn!("Meeting {} cancelled", meeting_id);
                run.finish(MeetingStatus::Cancelled);
            }
            Err(e) => {
                warn!("Meeting {} failed: {}", meeting_id, e);
                run.finish(MeetingStatus::InProgress);
            }
        }
        outcome
    }

    async fn run_phases(
        &self,
        context: &MeetingContext,
        progress: &dyn MeetingProgressNotifier,
    ) -> Result<MeetingResult, RunMeetingError> {
        let prep_results = self.phase_async_prep(context, progress).await?;

        self.meetings
            .set_phase(&context.meeting_id, MeetingPhase::SyncDecision);
        let decision = self
            .phase_sync_decision(context, &prep_results, progress)
            .await?;

        self.persist(context, &decision)?;

        Ok(MeetingResult::completed(
            context.meeting_id.clone(),
            &context.title,
            prep_results,
            decision,
        ))
    }

    /// Complete the meeting log and save the extracted outcomes.
    fn persist(
        &self,
        context: &MeetingContext,
        decision: &DecisionPhaseResult,
    ) -> Result<(), RunMeetingError> {
        let id = context.meeting_id.as_str();
        let mut log = self
            .store
            .load_record::<MeetingLog>(ArtifactKind::Meeting, id)?
            .unwrap_or_else(|| {
                MeetingLog::new(
                    context.meeting_id.clone(),
                    context.meeting_type,
                    &context.title,
                    context.agenda.clone(),
                    context.participant_names(),
                )
            });
        log.complete(
            &decision.decisions,
            &decision.action_items,
            &decision.discussion_log,
        );
        self.store.save_record(ArtifactKind::Meeting, id, &log)?;

        for extracted in &decision.decisions {
            let record = Decision::from_meeting(extracted, &context.meeting_id);
            self.store
                .save_record(ArtifactKind::Decision, &record.id, &record)?;
        }
        for extracted in &decision.action_items {
            let record = ActionItem::from_meeting(extracted, &context.meeting_id);
            self.store
                .save_record(ArtifactKind::ActionItem, &record.id, &record)?;
        }

        info!(
            "Persisted meeting {}: {} decision(s), {} action item(s)",
            id,
            decision.decisions.len(),
            decision.action_items.len()
        );
        Ok(())
    }

    /// Ask a participant to think, racing the cancellation token.
    ///
    /// The outer `Result` carries cancellation; the inner one is the
    /// participant's own outcome, which the phases record as data.
    async fn think(
        &self,
        participant: &dyn Participant,
        prompt: &str,
    ) -> Result<Result<String, ParticipantError>, RunMeetingError> {
        let outcome = match &self.cancellation {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(RunMeetingError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(RunMeetingError::Cancelled),
                    outcome = participant.think(prompt) => outcome,
                }
            }
            None => participant.think(prompt).await,
        };

        match outcome {
            Err(e) if e.is_cancelled() => Err(RunMeetingError::Cancelled),
            outcome => Ok(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::artifact_store::InMemoryArtifactStore;
    use async_trait::async_trait;
    use boardroom_domain::{ParticipantRole, PrepOutcome};
    use std::sync::Mutex;
    use std::time::Duration;

    type Script = Box<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

    /// Participant that answers from a closure and records its prompts
    struct ScriptedParticipant {
        id: String,
        role: ParticipantRole,
        name: String,
        inference: bool,
        delay: Option<Duration>,
        script: Script,
        prompts: Mutex<Vec<String>>,
        notes: Mutex<Vec<String>>,
    }

    impl ScriptedParticipant {
        fn new(id: &str, role: ParticipantRole, script: Script) -> Self {
            Self {
                id: id.to_string(),
                name: role.default_name(),
                role,
                inference: true,
                delay: None,
                script,
                prompts: Mutex::new(Vec::new()),
                notes: Mutex::new(Vec::new()),
            }
        }

        fn echo(id: &str, role: ParticipantRole) -> Self {
            let tag = id.to_string();
            Self::new(
                id,
                role,
                Box::new(move |prompt| {
                    let kind = if prompt.starts_with("You are preparing") {
                        "prep"
                    } else if prompt.starts_with("As the meeting facilitator") {
                        "synthesis"
                    } else {
                        "turn"
                    };
                    Ok(format!("{}-{}", tag, kind))
                }),
            )
        }

        fn silent(mut self) -> Self {
            self.inference = false;
            self
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        fn notes(&self) -> Vec<String> {
            self.notes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Participant for ScriptedParticipant {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> &ParticipantRole {
            &self.role
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn has_inference(&self) -> bool {
            self.inference
        }

        async fn think(&self, prompt: &str) -> Result<String, ParticipantError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.script)(prompt).map_err(|name| ParticipantError::NoInference { name })
        }

        fn note(&self, content: &str, _meeting_id: &MeetingId) {
            self.notes.lock().unwrap().push(content.to_string());
        }
    }

    const SYNTHESIS: &str = "SUMMARY: ok\n\
        DECISION: Launch the EU pilot in Q3\n\
        2. DECISION: Hire two SREs\n\
        ACTION: Draft pilot plan | OWNER: Product | DEADLINE: 2 weeks\n\
        ACTION: Open SRE reqs";

    fn facilitator() -> ScriptedParticipant {
        ScriptedParticipant::new(
            "ceo",
            ParticipantRole::Ceo,
            Box::new(|prompt| {
                if prompt.starts_with("As the meeting facilitator") {
                    Ok(SYNTHESIS.to_string())
                } else {
                    Ok("ceo-view".to_string())
                }
            }),
        )
    }

    fn orchestrator() -> (MeetingOrchestrator, Arc<InMemoryArtifactStore>) {
        let store = Arc::new(InMemoryArtifactStore::new());
        (MeetingOrchestrator::new(store.clone()), store)
    }

    fn seats(participants: &[Arc<ScriptedParticipant>]) -> Vec<Arc<dyn Participant>> {
        participants
            .iter()
            .map(|p| p.clone() as Arc<dyn Participant>)
            .collect()
    }

    fn agenda() -> Vec<String> {
        vec!["EU expansion".to_string(), "Hiring".to_string()]
    }

    #[tokio::test]
    async fn create_meeting_persists_initial_log() {
        let (orchestrator, store) = orchestrator();
        let ceo: Arc<dyn Participant> = Arc::new(facilitator());

        let context = orchestrator
            .create_meeting("Q3 Review", MeetingType::ExecutiveReview, agenda(), vec![ceo])
            .unwrap();

        assert_eq!(context.status, MeetingStatus::Scheduled);
        let store: &dyn ArtifactStore = &*store;
        let log: MeetingLog = store
            .load_record(ArtifactKind::Meeting, context.meeting_id.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(log.title, "Q3 Review");
        assert_eq!(log.participants, vec!["CEO".to_string()]);
        assert!(!log.is_completed());
        assert_eq!(orchestrator.list_active_meetings().len(), 1);
    }

    #[tokio::test]
    async fn run_unknown_meeting_is_not_found() {
        let (orchestrator, _) = orchestrator();
        let err = orchestrator
            .run_meeting(&MeetingId::from("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, RunMeetingError::MeetingNotFound(_)));
    }

    #[tokio::test]
    async fn full_run_persists_outcomes() {
        let (orchestrator, store) = orchestrator();
        let ceo = Arc::new(facilitator());
        let product = Arc::new(ScriptedParticipant::echo("prod", ParticipantRole::Product));
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::DecisionMeeting,
                agenda(),
                seats(&[ceo.clone(), product.clone()]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.status, MeetingStatus::Completed);
        assert_eq!(result.prep_results.len(), 2);
        assert_eq!(result.discussion_log.len(), 4);
        assert_eq!(result.decisions.len(), 2);
        assert_eq!(result.action_items.len(), 2);
        assert_eq!(result.action_items[1].owner, "TBD");
        assert!(result.synthesis_error.is_none());

        let store: &dyn ArtifactStore = &*store;
        let log: MeetingLog = store
            .load_record(ArtifactKind::Meeting, context.meeting_id.as_str())
            .unwrap()
            .unwrap();
        assert!(log.is_completed());
        assert_eq!(log.phase, MeetingPhase::Completed);
        let decision_ids: Vec<_> = result.decisions.iter().map(|d| d.id.clone()).collect();
        assert_eq!(log.decisions, decision_ids);

        let decisions: Vec<Decision> = store.list_records(ArtifactKind::Decision).unwrap();
        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|d| d.proposed_by == "meeting"));
        let actions: Vec<ActionItem> = store.list_records(ArtifactKind::ActionItem).unwrap();
        assert_eq!(actions.len(), 2);

        let meeting = orchestrator.get_meeting(&context.meeting_id).unwrap();
        assert_eq!(meeting.status, MeetingStatus::Completed);
        assert_eq!(meeting.current_phase, MeetingPhase::Completed);
        assert!(orchestrator.list_active_meetings().is_empty());

        assert_eq!(
            product.notes(),
            vec![
                "Prepared for meeting: Q3 Review".to_string(),
                "Spoke in meeting round 1".to_string(),
                "Spoke in meeting round 2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_preparation_is_recorded_and_meeting_continues() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(facilitator());
        let flaky = Arc::new(ScriptedParticipant::new(
            "eng",
            ParticipantRole::Engineering,
            Box::new(|prompt| {
                if prompt.starts_with("You are preparing") {
                    Err("backend down".to_string())
                } else {
                    Ok("eng-turn".to_string())
                }
            }),
        ));
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::TeamCheckin,
                agenda(),
                seats(&[ceo, flaky.clone()]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        let failed: Vec<_> = result.failed_preparations().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].participant_id, "eng");
        assert!(matches!(failed[0].outcome, PrepOutcome::Failed(_)));
        assert_eq!(result.discussion_log.len(), 4);

        // The failed preparation never reaches the shared context.
        let first_turn = &flaky.prompts()[1];
        assert!(first_turn.contains("ceo-view"));
        assert!(!first_turn.contains("Engineering Expert (Engineering)"));
    }

    #[tokio::test]
    async fn discussion_context_grows_turn_by_turn() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(ScriptedParticipant::echo("ceo", ParticipantRole::Ceo));
        let strategy = Arc::new(ScriptedParticipant::echo("strat", ParticipantRole::Strategy));
        let context = orchestrator
            .create_meeting(
                "Roadmap",
                MeetingType::ExecutiveReview,
                agenda(),
                seats(&[ceo.clone(), strategy.clone()]),
            )
            .unwrap();

        orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        let ceo_prompts = ceo.prompts();
        let strategy_prompts = strategy.prompts();
        // prep, round 1, round 2 (+ synthesis for the facilitator)
        assert_eq!(ceo_prompts.len(), 4);
        assert_eq!(strategy_prompts.len(), 3);

        let ceo_round1 = &ceo_prompts[1];
        assert!(ceo_round1.contains("Meeting: Roadmap\n\nPreparations:\n"));
        assert!(ceo_round1.contains("\nCEO (CEO):\nceo-prep\n"));
        assert!(ceo_round1.contains("\nStrategy Expert (Strategy):\nstrat-prep\n"));
        assert!(ceo_round1.contains("Round: 1 of 2"));

        let strategy_round1 = &strategy_prompts[1];
        assert!(strategy_round1.contains("\n\nCEO: ceo-turn"));
        assert!(!strategy_round1.contains("Strategy Expert: strat-turn"));

        let ceo_round2 = &ceo_prompts[2];
        assert!(ceo_round2.contains("Round: 2 of 2"));
        assert!(ceo_round2.contains("\n\nStrategy Expert: strat-turn"));

        let synthesis = &ceo_prompts[3];
        assert!(synthesis.starts_with("As the meeting facilitator"));
        assert!(synthesis.contains("Agenda: EU expansion; Hiring"));
        assert_eq!(synthesis.matches("CEO: ceo-turn").count(), 2);
    }

    #[tokio::test]
    async fn failed_turn_is_visible_to_later_speakers() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(facilitator());
        let board = Arc::new(ScriptedParticipant::new(
            "bod",
            ParticipantRole::Board,
            Box::new(|prompt| {
                if prompt.contains("Round: 1 of 2") {
                    Err("rate limited".to_string())
                } else {
                    Ok("bod-says".to_string())
                }
            }),
        ));
        let context = orchestrator
            .create_meeting(
                "Budget",
                MeetingType::BoardReview,
                agenda(),
                seats(&[board.clone(), ceo.clone()]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.discussion_log.len(), 3);
        let ceo_round1 = &ceo.prompts()[1];
        assert!(ceo_round1.contains("Board of Directors: [Error: "));
        assert!(!board.notes().contains(&"Spoke in meeting round 1".to_string()));
    }

    #[tokio::test]
    async fn facilitator_falls_back_to_first_participant() {
        let (orchestrator, _) = orchestrator();
        let product = Arc::new(ScriptedParticipant::echo("prod", ParticipantRole::Product));
        let eng = Arc::new(ScriptedParticipant::echo("eng", ParticipantRole::Engineering));
        let context = orchestrator
            .create_meeting(
                "Sprint",
                MeetingType::TeamCheckin,
                agenda(),
                seats(&[product.clone(), eng.clone()]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.synthesis.as_deref(), Some("prod-synthesis"));
        assert!(result.decisions.is_empty());
        assert_eq!(eng.prompts().len(), 3);
    }

    #[tokio::test]
    async fn synthesis_failure_yields_no_decisions() {
        let (orchestrator, store) = orchestrator();
        let ceo = Arc::new(ScriptedParticipant::new(
            "ceo",
            ParticipantRole::Ceo,
            Box::new(|prompt| {
                if prompt.starts_with("As the meeting facilitator") {
                    Err("quota exceeded".to_string())
                } else {
                    Ok("fine".to_string())
                }
            }),
        ));
        let context = orchestrator
            .create_meeting("Budget", MeetingType::DecisionMeeting, agenda(), seats(&[ceo]))
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.status, MeetingStatus::Completed);
        assert!(result.decisions.is_empty());
        assert!(result.action_items.is_empty());
        assert!(result.synthesis.is_none());
        assert!(result.synthesis_error.is_some());

        let store: &dyn ArtifactStore = &*store;
        let log: MeetingLog = store
            .load_record(ArtifactKind::Meeting, context.meeting_id.as_str())
            .unwrap()
            .unwrap();
        assert!(log.is_completed());
        assert!(store.list_all(ArtifactKind::Decision).unwrap().is_empty());
    }

    #[tokio::test]
    async fn participants_without_inference_are_skipped() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(facilitator());
        let observer =
            Arc::new(ScriptedParticipant::echo("obs", ParticipantRole::Board).silent());
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::BoardReview,
                agenda(),
                seats(&[observer.clone(), ceo]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert!(observer.prompts().is_empty());
        assert_eq!(result.prep_results.len(), 1);
        assert_eq!(result.discussion_log.len(), 2);
        assert_eq!(result.decisions.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_run_of_same_meeting_is_rejected() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let orchestrator = Arc::new(MeetingOrchestrator::new(store));
        let ceo: Arc<dyn Participant> =
            Arc::new(facilitator().slow(Duration::from_secs(5)));
        let context = orchestrator
            .create_meeting("Q3 Review", MeetingType::ExecutiveReview, agenda(), vec![ceo])
            .unwrap();

        let first = {
            let orchestrator = orchestrator.clone();
            let id = context.meeting_id.clone();
            tokio::spawn(async move { orchestrator.run_meeting(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let err = orchestrator
            .run_meeting(&context.meeting_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RunMeetingError::MeetingAlreadyRunning(_)));
        assert_eq!(
            orchestrator.get_meeting(&context.meeting_id).unwrap().status,
            MeetingStatus::InProgress
        );

        let result = first.await.unwrap().unwrap();
        assert_eq!(result.status, MeetingStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_run() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let token = CancellationToken::new();
        let orchestrator =
            MeetingOrchestrator::new(store.clone()).with_cancellation(token.clone());
        let ceo = Arc::new(facilitator().slow(Duration::from_secs(60)));
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::ExecutiveReview,
                agenda(),
                seats(&[ceo.clone()]),
            )
            .unwrap();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let err = orchestrator
            .run_meeting(&context.meeting_id)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, RunMeetingError::Cancelled));
        assert_eq!(ceo.prompts().len(), 1);
        assert_eq!(
            orchestrator.get_meeting(&context.meeting_id).unwrap().status,
            MeetingStatus::Cancelled
        );
        let store: &dyn ArtifactStore = &*store;
        let log: MeetingLog = store
            .load_record(ArtifactKind::Meeting, context.meeting_id.as_str())
            .unwrap()
            .unwrap();
        assert!(!log.is_completed());
    }

    #[tokio::test]
    async fn three_participant_meeting_runs_two_full_rounds() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(facilitator());
        let product = Arc::new(ScriptedParticipant::echo("prod", ParticipantRole::Product));
        let eng = Arc::new(ScriptedParticipant::echo("eng", ParticipantRole::Engineering));
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::ExecutiveReview,
                agenda(),
                seats(&[ceo, product, eng]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.prep_results.len(), 3);
        assert!(result.prep_results.iter().all(|p| p.is_success()));
        assert_eq!(result.discussion_log.len(), 6);
        let speakers: Vec<(u8, &str)> = result
            .discussion_log
            .iter()
            .map(|e| (e.round, e.participant_id.as_str()))
            .collect();
        assert_eq!(
            speakers,
            vec![
                (1, "ceo"),
                (1, "prod"),
                (1, "eng"),
                (2, "ceo"),
                (2, "prod"),
                (2, "eng"),
            ]
        );

        let decisions: Vec<&str> = result
            .decisions
            .iter()
            .map(|d| d.description.as_str())
            .collect();
        assert_eq!(decisions, vec!["Launch the EU pilot in Q3", "Hire two SREs"]);

        let actions: Vec<(&str, &str, &str)> = result
            .action_items
            .iter()
            .map(|a| (a.description.as_str(), a.owner.as_str(), a.deadline.as_str()))
            .collect();
        assert_eq!(
            actions,
            vec![
                ("Draft pilot plan", "Product", "2 weeks"),
                ("Open SRE reqs", "TBD", "TBD"),
            ]
        );
    }

    #[tokio::test]
    async fn middle_preparation_failure_leaves_neighbours_prepared() {
        let (orchestrator, _) = orchestrator();
        let ceo = Arc::new(facilitator());
        let flaky = Arc::new(ScriptedParticipant::new(
            "prod",
            ParticipantRole::Product,
            Box::new(|prompt| {
                if prompt.starts_with("You are preparing") {
                    Err("backend down".to_string())
                } else {
                    Ok("prod-turn".to_string())
                }
            }),
        ));
        let eng = Arc::new(ScriptedParticipant::echo("eng", ParticipantRole::Engineering));
        let context = orchestrator
            .create_meeting(
                "Q3 Review",
                MeetingType::ExecutiveReview,
                agenda(),
                seats(&[ceo, flaky, eng]),
            )
            .unwrap();

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();

        assert_eq!(result.prep_results.len(), 3);
        let ceo_prep = result.prep_results.get("ceo").unwrap();
        assert_eq!(ceo_prep.outcome, PrepOutcome::Prepared("ceo-view".to_string()));
        let eng_prep = result.prep_results.get("eng").unwrap();
        assert_eq!(eng_prep.outcome, PrepOutcome::Prepared("eng-prep".to_string()));
        let prod_prep = result.prep_results.get("prod").unwrap();
        assert!(matches!(prod_prep.outcome, PrepOutcome::Failed(_)));
        assert_eq!(result.discussion_log.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_run_releases_the_meeting() {
        let (orchestrator, _) = orchestrator();
        let ceo: Arc<dyn Participant> =
            Arc::new(facilitator().slow(Duration::from_secs(60)));
        let context = orchestrator
            .create_meeting("Q3 Review", MeetingType::ExecutiveReview, agenda(), vec![ceo])
            .unwrap();

        let timed_out = tokio::time::timeout(
            Duration::from_secs(1),
            orchestrator.run_meeting(&context.meeting_id),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(
            orchestrator.get_meeting(&context.meeting_id).unwrap().status,
            MeetingStatus::Cancelled
        );

        let result = orchestrator.run_meeting(&context.meeting_id).await.unwrap();
        assert_eq!(result.status, MeetingStatus::Completed);
    }
}
