//! Provider registry entities.
//!
//! A [`ProvidersConfig`] is the full persisted record: every configured
//! [`ProviderDescriptor`] plus the global [`DispatchSettings`] that the
//! resilient invoker applies to every call.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wire protocol family of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// The hosted OpenAI API
    #[serde(rename = "openai")]
    OpenAi,
    /// Any endpoint speaking the OpenAI chat-completions protocol
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
    /// The Anthropic messages API
    #[serde(rename = "anthropic")]
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenAiCompatible => "openai-compatible",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "openai-compatible" | "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => Err(DomainError::InvalidProvider(format!(
                "unknown provider kind '{}'",
                other
            ))),
        }
    }
}

/// A configured inference backend (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique identifier within a registry
    pub id: String,
    /// Display name, also the key in failover error reports
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(rename = "api_key")]
    pub credential: String,
    #[serde(rename = "base_url", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_override: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
    pub default_model: String,
    /// Lower sorts first
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_priority() -> i32 {
    1
}

fn default_enabled() -> bool {
    true
}

impl ProviderDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ProviderKind,
        credential: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            credential: credential.into(),
            endpoint_override: None,
            models: Vec::new(),
            default_model: default_model.into(),
            priority: default_priority(),
            enabled: true,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check the descriptor's own invariants.
    ///
    /// `default_model` must be listed in `models` whenever `models` is non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidProvider(
                "provider id cannot be empty".to_string(),
            ));
        }
        if self.default_model.trim().is_empty() {
            return Err(DomainError::InvalidProvider(format!(
                "provider '{}' has no default model",
                self.id
            )));
        }
        if !self.models.is_empty() && !self.models.contains(&self.default_model) {
            return Err(DomainError::InvalidProvider(format!(
                "provider '{}': default model '{}' is not in its model list",
                self.id, self.default_model
            )));
        }
        Ok(())
    }
}

/// Global dispatch settings shared by every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Move on to the next provider once one exhausts its retries
    pub auto_switch: bool,
    /// Attempts per provider, at least 1
    pub max_retries: u32,
    /// Base backoff delay in seconds, doubled after every failed attempt
    #[serde(rename = "retry_delay")]
    pub retry_delay_seconds: f64,
    /// Allow the host to serve offline mock responses when nothing is configured
    pub fallback_to_mock: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            auto_switch: true,
            max_retries: 3,
            retry_delay_seconds: 1.0,
            fallback_to_mock: true,
        }
    }
}

impl DispatchSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_retries < 1 {
            return Err(DomainError::InvalidSettings(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if !self.retry_delay_seconds.is_finite() || self.retry_delay_seconds < 0.0 {
            return Err(DomainError::InvalidSettings(
                "retry_delay must be a non-negative number of seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Backoff before retrying after the given failed attempt (1-based).
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn backoff_for_attempt(&self, attempt: u32) -> std::time::Duration {
        // 2^1024 is already infinite as f64
        let exponent = attempt.saturating_sub(1).min(1024) as i32;
        let seconds = (self.retry_delay_seconds * 2f64.powi(exponent)).max(0.0);
        std::time::Duration::try_from_secs_f64(seconds).unwrap_or(std::time::Duration::MAX)
    }
}

/// Root record of the provider registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub providers: Vec<ProviderDescriptor>,
    #[serde(default)]
    pub settings: DispatchSettings,
}

impl ProvidersConfig {
    /// Enabled providers sorted ascending by priority.
    ///
    /// The sort is stable, so equal priorities keep insertion order.
    pub fn enabled_providers(&self) -> Vec<ProviderDescriptor> {
        let mut enabled: Vec<ProviderDescriptor> =
            self.providers.iter().filter(|p| p.enabled).cloned().collect();
        enabled.sort_by_key(|p| p.priority);
        enabled
    }

    pub fn get_provider(&self, id: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Insert or replace a provider by id.
    ///
    /// A replaced provider moves to the end, matching a remove-then-append.
    pub fn upsert(&mut self, provider: ProviderDescriptor) {
        self.providers.retain(|p| p.id != provider.id);
        self.providers.push(provider);
    }

    /// Remove a provider; returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| p.id != id);
        self.providers.len() < before
    }

    /// Set the enabled flag; returns whether the provider exists.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.providers.iter_mut().find(|p| p.id == id) {
            Some(provider) => {
                provider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.settings.validate()?;
        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.id.as_str()) {
                return Err(DomainError::DuplicateProvider(provider.id.clone()));
            }
        }
        Ok(())
    }
}
