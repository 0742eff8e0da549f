//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

use boardroom_application::InvokerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("invoker.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("invoker.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("invoker.max_tokens cannot be 0")]
    InvalidMaxTokens,
}

/// Raw invoker configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInvokerConfig {
    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,
    /// Sampling temperature sent with every request
    pub temperature: f32,
    /// Response length cap; the provider default applies when unset
    pub max_tokens: Option<u32>,
}

impl Default for FileInvokerConfig {
    fn default() -> Self {
        let defaults = InvokerConfig::default();
        Self {
            timeout_seconds: defaults.attempt_timeout.as_secs(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }
}

impl FileInvokerConfig {
    pub fn to_invoker_config(&self) -> InvokerConfig {
        InvokerConfig::default()
            .with_timeout_seconds(self.timeout_seconds)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Root of the artifact workspace (default: `./workspace`)
    pub workspace_dir: Option<PathBuf>,
    /// Override for the provider registry file
    pub providers_file: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("workspace"))
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for meeting transcripts (JSONL); disabled when unset
    pub transcript_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub invoker: FileInvokerConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.invoker.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        let temperature = self.invoker.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigValidationError::InvalidTemperature(temperature));
        }
        if self.invoker.max_tokens == Some(0) {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }
        Ok(())
    }
}
