//! Offline mock transport
//!
//! Produces deterministic, meeting-shaped responses without any network
//! access. The CLI only wires it in when the registry allows
//! `fallback_to_mock` and no provider is enabled.

use async_trait::async_trait;
use boardroom_application::{ChunkStream, ProviderTransport, TransportError, TransportFactory};
use boardroom_domain::{
    CompletionRequest, InvocationResult, ProviderDescriptor, ProviderKind, Role, TokenUsage,
};
use futures::StreamExt;

/// Provider id the CLI registers the mock under
pub const MOCK_PROVIDER_ID: &str = "mock";

/// A descriptor for the mock provider
pub fn mock_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::new(
        MOCK_PROVIDER_ID,
        "Offline mock",
        ProviderKind::OpenAiCompatible,
        "",
        "mock-model",
    )
}

const SYNTHESIS: &str = "SUMMARY: The team aligned on focusing the next quarter on one product bet.
DECISION: Focus on the highest-impact initiative raised in the discussion
DECISION: Ship a minimum viable version before the end of the quarter
ACTION: Conduct user research | OWNER: Product | DEADLINE: 2 weeks
ACTION: Design technical architecture | OWNER: Engineering | DEADLINE: 3 weeks
OPEN_QUESTIONS: Budget for the follow-up phase
NEXT_STEPS: Review progress at the next executive meeting";

const PREPARATION: &str = "KEY_POINTS: Current position is stable; the agenda items need a clear owner.
RECOMMENDATIONS: Prioritize one initiative and measure it.
CONCERNS: Capacity is limited.
QUESTIONS: What is the budget envelope?
DATA: No live data in offline mode.";

const DISCUSSION: &str = "REACTION: I agree with the direction so far.
POSITION: Support focusing on a single initiative.
PROPOSAL: Commit to an MVP with a fixed scope.
CONCERNS: Keep the timeline realistic.";

/// Transport that answers from canned text
#[derive(Debug, Clone, Default)]
pub struct MockTransport;

impl MockTransport {
    pub fn respond(request: &CompletionRequest) -> String {
        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if prompt.starts_with("As the meeting facilitator") {
            SYNTHESIS.to_string()
        } else if prompt.starts_with("You are preparing for a meeting") {
            PREPARATION.to_string()
        } else if prompt.starts_with("You are in a meeting") {
            DISCUSSION.to_string()
        } else {
            let preview: String = prompt.chars().take(60).collect();
            format!("[mock] Received: {}", preview)
        }
    }
}

#[async_trait]
impl ProviderTransport for MockTransport {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<InvocationResult, TransportError> {
        let content = Self::respond(request);
        let words = content.split_whitespace().count() as u32;
        Ok(InvocationResult::new(content, TokenUsage::new(0, words)))
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, TransportError> {
        let chunks: Vec<Result<String, TransportError>> = Self::respond(request)
            .split_inclusive(' ')
            .map(|word| Ok(word.to_string()))
            .collect();
        Ok(futures::stream::iter(chunks).boxed())
    }
}

/// Factory that hands out [`MockTransport`] for every descriptor
#[derive(Debug, Clone, Default)]
pub struct MockTransportFactory;

impl TransportFactory for MockTransportFactory {
    fn create(
        &self,
        _descriptor: &ProviderDescriptor,
    ) -> Result<Box<dyn ProviderTransport>, TransportError> {
        Ok(Box::new(MockTransport))
    }
}
