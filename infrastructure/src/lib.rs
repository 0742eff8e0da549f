//! Infrastructure layer for boardroom
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod artifacts;
pub mod config;
pub mod logging;
pub mod provider_store;
pub mod providers;

// Re-export commonly used types
pub use artifacts::JsonArtifactStore;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileInvokerConfig, FileLoggingConfig,
    FileStorageConfig,
};
pub use logging::JsonlConversationLogger;
pub use provider_store::{InMemoryProviderStore, JsonProviderStore};
pub use providers::{
    AnthropicTransport, HttpTransportFactory, MockTransport, MockTransportFactory,
    OpenAiTransport,
    mock::{MOCK_PROVIDER_ID, mock_descriptor},
};
