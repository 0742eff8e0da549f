//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as provider call timeouts and sampling parameters.

use std::time::Duration;

/// Default per-attempt timeout for provider calls
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 120;

/// Invoker behavior configuration.
///
/// Retry count, backoff and failover live in the provider registry's
/// dispatch settings; this covers what the registry file doesn't.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokerConfig {
    /// Maximum time for a single provider attempt.
    pub attempt_timeout: Duration,
    /// Default sampling temperature for agents.
    pub temperature: f32,
    /// Upper bound on generated tokens, if any.
    pub max_tokens: Option<u32>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

impl InvokerConfig {
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.attempt_timeout = Duration::from_secs(seconds);
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
