//! Provider registry
//!
//! Holds the current [`ProvidersConfig`] snapshot behind a `RwLock` and writes
//! every mutation through the [`ProviderConfigStore`] before committing it in
//! memory. Readers clone what they need; no lock outlives a method call.

use crate::ports::provider_store::{ProviderConfigStore, ProviderStoreError};
use boardroom_domain::{DispatchSettings, DomainError, ProviderDescriptor, ProvidersConfig};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Failed to persist provider config: {0}")]
    Store(#[from] ProviderStoreError),
}

/// Registry of inference providers and dispatch settings
pub struct ProviderRegistry {
    store: Arc<dyn ProviderConfigStore>,
    config: RwLock<ProvidersConfig>,
}

impl ProviderRegistry {
    /// Load the registry from its store.
    ///
    /// A store with nothing in it is seeded with the default config
    /// (no providers, default settings), which is saved right away.
    pub fn load(store: Arc<dyn ProviderConfigStore>) -> Result<Self, RegistryError> {
        let config = Self::read_store(store.as_ref())?;
        Ok(Self {
            store,
            config: RwLock::new(config),
        })
    }

    fn read_store(store: &dyn ProviderConfigStore) -> Result<ProvidersConfig, RegistryError> {
        match store.load()? {
            Some(config) => {
                config.validate()?;
                debug!(
                    "Loaded {} provider(s) from {}",
                    config.providers.len(),
                    store.location()
                );
                Ok(config)
            }
            None => {
                let config = ProvidersConfig::default();
                store.save(&config)?;
                info!("Created default provider config at {}", store.location());
                Ok(config)
            }
        }
    }

    /// Re-read the store, replacing the in-memory snapshot.
    pub fn reload(&self) -> Result<(), RegistryError> {
        let config = Self::read_store(self.store.as_ref())?;
        *self.write() = config;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, ProvidersConfig> {
        self.config.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProvidersConfig> {
        self.config.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a change to a copy, validate, persist, then commit.
    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut ProvidersConfig) -> (R, bool),
    ) -> Result<R, RegistryError> {
        let mut guard = self.write();
        let mut next = guard.clone();
        let (result, changed) = change(&mut next);
        if !changed {
            return Ok(result);
        }
        next.validate()?;
        self.store.save(&next)?;
        *guard = next;
        Ok(result)
    }

    /// Full copy of the current config.
    pub fn snapshot(&self) -> ProvidersConfig {
        self.read().clone()
    }

    /// Enabled providers, ascending by priority (ties keep insertion order).
    pub fn enabled_providers(&self) -> Vec<ProviderDescriptor> {
        self.read().enabled_providers()
    }

    pub fn get_provider(&self, id: &str) -> Option<ProviderDescriptor> {
        self.read().get_provider(id).cloned()
    }

    pub fn settings(&self) -> DispatchSettings {
        self.read().settings.clone()
    }

    /// All providers in insertion order.
    pub fn list_providers(&self) -> Vec<ProviderDescriptor> {
        self.read().providers.clone()
    }

    /// Add a provider, replacing any existing provider with the same id.
    pub fn add(&self, provider: ProviderDescriptor) -> Result<(), RegistryError> {
        provider.validate()?;
        let id = provider.id.clone();
        self.mutate(|config| {
            config.upsert(provider);
            ((), true)
        })?;
        info!("Provider '{}' saved", id);
        Ok(())
    }

    /// Remove a provider. Returns whether it existed.
    pub fn remove(&self, id: &str) -> Result<bool, RegistryError> {
        self.mutate(|config| {
            let removed = config.remove(id);
            (removed, removed)
        })
    }

    /// Enable a provider. Returns whether it exists.
    pub fn enable(&self, id: &str) -> Result<bool, RegistryError> {
        self.set_enabled(id, true)
    }

    /// Disable a provider. Returns whether it exists.
    pub fn disable(&self, id: &str) -> Result<bool, RegistryError> {
        self.set_enabled(id, false)
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> Result<bool, RegistryError> {
        self.mutate(|config| {
            let found = config.set_enabled(id, enabled);
            (found, found)
        })
    }

    pub fn update_settings(&self, settings: DispatchSettings) -> Result<(), RegistryError> {
        settings.validate()?;
        self.mutate(|config| {
            config.settings = settings;
            ((), true)
        })
    }

    /// Where the registry is persisted.
    pub fn location(&self) -> String {
        self.store.location()
    }
}
