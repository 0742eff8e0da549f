//! Domain layer for boardroom
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Providers
//!
//! Inference backends are described by [`ProviderDescriptor`]s. Dispatch over
//! them is governed by [`DispatchSettings`]: priority order, retries with
//! exponential backoff, and failover to the next provider.
//!
//! ## Meetings
//!
//! A meeting runs role participants through two phases:
//!
//! - **Async Preparation**: every participant prepares independently
//! - **Sync Decision**: two discussion rounds, then the facilitator synthesizes
//!
//! The synthesis is parsed into [`ExtractedDecision`]s and
//! [`ExtractedActionItem`]s by [`parse_synthesis`].

pub mod agent;
pub mod core;
pub mod meeting;
pub mod prompt;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use agent::{
    actions::{ActionOutcome, AgentAction},
    thought::AgentThought,
};
pub use core::{
    error::DomainError,
    id::{MeetingId, short_id},
};
pub use meeting::{
    artifacts::{ActionItem, ArtifactKind, Decision, MeetingLog, summarize_discussion},
    synthesis::{ParsedSynthesis, parse_synthesis},
    types::{MeetingPhase, MeetingStatus, MeetingType, ParticipantRole},
    validation::{ConfigIssue, ConfigIssueCode, Severity, validate_setup},
    value_objects::{
        ActionItemStatus, DecisionPhaseResult, DecisionStatus, DiscussionEntry,
        ExtractedActionItem, ExtractedDecision, MeetingResult, PrepOutcome, PrepResult,
        PrepResults,
    },
};
pub use prompt::{DISCUSSION_ROUNDS, MeetingPromptTemplate, RolePromptTemplate};
pub use provider::{DispatchSettings, ProviderDescriptor, ProviderKind, ProvidersConfig};
pub use session::{
    entities::{CompletionRequest, InvocationResult, Message, Role, TokenUsage},
    stream::StreamEvent,
};
