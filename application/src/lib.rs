//! Application layer for boardroom
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::InvokerConfig;
pub use ports::{
    artifact_store::{ArtifactStore, ArtifactStoreError, InMemoryArtifactStore},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    participant::{Participant, ParticipantError},
    progress::{MeetingProgressNotifier, NoProgress},
    provider_store::{ProviderConfigStore, ProviderStoreError},
    provider_transport::{
        ChunkStream, ProviderTransport, StreamHandle, TransportError, TransportFactory,
    },
};
pub use use_cases::agent::LlmAgent;
pub use use_cases::invoke::{InvokeError, ProviderCheck, ResilientInvoker};
pub use use_cases::registry::{ProviderRegistry, RegistryError};
pub use use_cases::run_meeting::{MeetingContext, MeetingOrchestrator, RunMeetingError};
pub use use_cases::workspace::WorkspaceSummary;
