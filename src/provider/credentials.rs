//! Credential lookup for model bindings.

use super::binding::ModelBinding;
use serde::Serialize;
use std::collections::HashMap;

/// Source of provider credentials, keyed by environment variable name.
pub trait CredentialSource: Send + Sync {
    /// Credential value, or `None` when unset or blank.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Fixed credential map, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Present,
    Missing,
}

impl CredentialStatus {
    pub fn of(binding: &ModelBinding, credentials: &dyn CredentialSource) -> Self {
        if credentials.get(binding.credential_env()).is_some() {
            CredentialStatus::Present
        } else {
            CredentialStatus::Missing
        }
    }
}
