use crate::config::{FallbackConfig, GenerationConfig, DEFAULT_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS};
use std::time::Duration;

/// Bounded retries with a constant pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never below one.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_millis(DEFAULT_BACKOFF_MS))
    }
}

/// Use `fallback` when the client for `primary` cannot be constructed.
///
/// Applies once per submission; the fallback itself never falls back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRule {
    pub primary: String,
    pub fallback: String,
}

impl FallbackRule {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &FallbackConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.primary.clone(), config.fallback.clone()))
    }

    pub fn applies_to(&self, model_id: &str) -> bool {
        self.primary == model_id
    }
}
