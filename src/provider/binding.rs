//! Model bindings: which provider, remote model, and credential a model id maps to.
//!
//! Bindings are assembled once at startup (built-ins overlaid with the `[models]`
//! configuration table) and never change afterward.

use super::credentials::{CredentialSource, CredentialStatus};
use crate::config::AppConfig;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hosted provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
}

impl ProviderType {
    /// Environment variable that holds the credential when a binding names none.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "GOOGLE_API_KEY",
            ProviderType::OpenAI => "OPENAI_API_KEY",
            ProviderType::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAI => "openai",
            ProviderType::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A model id bound to a provider endpoint and credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBinding {
    /// Filled from the `[models.<id>]` table key when omitted.
    #[serde(default)]
    pub model_id: String,
    pub provider_type: ProviderType,
    /// Remote model name sent to the provider.
    pub model: String,
    /// Environment variable holding the credential.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Base URL override (e.g. a regional or proxy endpoint).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Temperature used for plans and chat when none is given explicitly.
    #[serde(default)]
    pub default_temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ModelBinding {
    pub fn new(model_id: &str, provider_type: ProviderType, model: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            provider_type,
            model: model.to_string(),
            api_key_env: None,
            endpoint: None,
            default_temperature: None,
            max_tokens: None,
        }
    }

    pub fn credential_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider_type.default_api_key_env())
    }

    /// Checks the binding's own fields. The endpoint is checked when a client is
    /// built, so an unreachable primary can still be replaced by the fallback.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_id.trim().is_empty() {
            return Err("Model id cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("Remote model name cannot be empty".to_string());
        }
        if let Some(env) = &self.api_key_env {
            if env.trim().is_empty() {
                return Err("api_key_env cannot be empty when set".to_string());
            }
        }
        if let Some(temp) = self.default_temperature {
            if !(0.0..=1.0).contains(&temp) {
                return Err(format!("default_temperature must be within 0.0..=1.0, got {}", temp));
            }
        }
        if self.max_tokens == Some(0) {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Bindings available without any configuration.
pub fn builtin_bindings() -> Vec<ModelBinding> {
    vec![
        ModelBinding::new("gemini-pro", ProviderType::Gemini, "gemini-pro"),
        ModelBinding::new("gemini-1.5-pro", ProviderType::Gemini, "gemini-1.5-pro"),
        ModelBinding::new("gemini-1.5-flash", ProviderType::Gemini, "gemini-1.5-flash"),
        ModelBinding::new("gpt-4o-mini", ProviderType::OpenAI, "gpt-4o-mini"),
        ModelBinding::new(
            "claude-3-5-sonnet",
            ProviderType::Anthropic,
            "claude-3-5-sonnet-latest",
        ),
    ]
}

/// Read-only registry of model bindings keyed by model id.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    bindings: BTreeMap<String, ModelBinding>,
}

impl BindingRegistry {
    pub fn new(bindings: impl IntoIterator<Item = ModelBinding>) -> Self {
        Self {
            bindings: bindings
                .into_iter()
                .map(|binding| (binding.model_id.clone(), binding))
                .collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_bindings())
    }

    /// Built-in bindings overlaid with the configured `[models]` table.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let mut registry = Self::builtin();
        for (model_id, binding) in &config.models {
            let mut binding = binding.clone();
            if binding.model_id.is_empty() {
                binding.model_id = model_id.clone();
            }
            binding.validate().map_err(|e| {
                ApiError::ConfigError(format!("Model '{}': {}", model_id, e))
            })?;
            registry.bindings.insert(model_id.clone(), binding);
        }
        Ok(registry)
    }

    pub fn get(&self, model_id: &str) -> Option<&ModelBinding> {
        self.bindings.get(model_id)
    }

    pub fn get_or_error(&self, model_id: &str) -> Result<&ModelBinding, ApiError> {
        self.get(model_id).ok_or_else(|| {
            let known: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
            ApiError::UnknownModel(format!(
                "{} (configured models: {})",
                model_id,
                known.join(", ")
            ))
        })
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.bindings.contains_key(model_id)
    }

    /// All bindings, ordered by model id.
    pub fn list(&self) -> Vec<&ModelBinding> {
        self.bindings.values().collect()
    }

    pub fn credential_status(
        &self,
        model_id: &str,
        credentials: &dyn CredentialSource,
    ) -> Result<CredentialStatus, ApiError> {
        let binding = self.get_or_error(model_id)?;
        Ok(CredentialStatus::of(binding, credentials))
    }
}
