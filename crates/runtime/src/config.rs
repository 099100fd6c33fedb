//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use economy_core::MAX_DRAWS_PER_REDEMPTION;

/// Tunables shared across the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Hard cap on draws per redemption (default: 50).
    pub max_draws_per_redemption: u32,
    /// Retry policy for idempotent store operations.
    pub retry: RetryPolicy,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            max_draws_per_redemption: MAX_DRAWS_PER_REDEMPTION,
            retry: RetryPolicy::default(),
        }
    }
}

impl EconomyConfig {
    /// Parse a config from TOML text. Absent fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Bounded retry with exponential backoff for retryable store failures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first (default: 3).
    pub max_attempts: u32,
    /// Backoff before attempt n+1 is `backoff_base_ms << n` (default: 50).
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// Backoff duration after a failed attempt (0-based).
    pub fn backoff_after(&self, attempt: u32) -> std::time::Duration {
        std::time::Duration::from_millis(self.backoff_base_ms << attempt.min(10))
    }
}
