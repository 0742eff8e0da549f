//! Provider configuration store port
//!
//! Persists the whole [`ProvidersConfig`] record. Calls are synchronous:
//! the registry writes through before it commits a mutation in memory.

use boardroom_domain::ProvidersConfig;
use thiserror::Error;

/// Errors from the provider configuration store
#[derive(Error, Debug)]
pub enum ProviderStoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed provider config {path}: {message}")]
    Malformed { path: String, message: String },
}

/// Durable storage for the provider registry
pub trait ProviderConfigStore: Send + Sync {
    /// Load the stored config, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<ProvidersConfig>, ProviderStoreError>;

    /// Replace the stored config.
    fn save(&self, config: &ProvidersConfig) -> Result<(), ProviderStoreError>;

    /// Human-readable location, for diagnostics.
    fn location(&self) -> String;
}
