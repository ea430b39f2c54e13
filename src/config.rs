//! Configuration System
//!
//! Layered configuration for model bindings, retry behavior, conversation
//! window, prompt template, and logging. Sources are merged by the `config`
//! crate: built-in defaults, the user-level file, then workspace files.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::prompt::PromptTemplate;
use crate::provider::{BindingRegistry, ModelBinding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_MS: u64 = 2000;
pub const DEFAULT_CONVERSATION_WINDOW: usize = 5;
/// Upper bound on `generation.max_attempts`; keeps a misconfiguration from hammering a provider.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model used when a submission names none; its credential must be present.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Extra or overriding model bindings, keyed by model id
    #[serde(default)]
    pub models: BTreeMap<String, ModelBinding>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            models: BTreeMap::new(),
            generation: GenerationConfig::default(),
            conversation: ConversationConfig::default(),
            prompt: PromptConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Retry and fallback settings for remote calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Total attempts per submission, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Constant pause between attempts (milliseconds)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default)]
    pub fallback: FallbackConfig,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_ms() -> u64 {
    DEFAULT_BACKOFF_MS
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_ms: DEFAULT_BACKOFF_MS,
            fallback: FallbackConfig::default(),
        }
    }
}

/// Substitute `fallback` when the client for `primary` cannot be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fallback_primary")]
    pub primary: String,
    #[serde(default = "default_fallback_model")]
    pub fallback: String,
}

fn default_true() -> bool {
    true
}

fn default_fallback_primary() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_fallback_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            primary: default_fallback_primary(),
            fallback: default_fallback_model(),
        }
    }
}

/// Chat history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Number of past turns sent with each new message
    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_window() -> usize {
    DEFAULT_CONVERSATION_WINDOW
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_CONVERSATION_WINDOW,
            system_prompt: None,
        }
    }
}

/// Prompt template settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Custom template file; relative paths resolve against the workspace root
    #[serde(default)]
    pub template_path: Option<PathBuf>,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Model(String, String),
    Generation(String),
    Conversation(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Model(name, msg) => write!(f, "Model '{}': {}", name, msg),
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Conversation(msg) => write!(f, "Conversation: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (name, binding) in &self.models {
            let mut named = binding.clone();
            if named.model_id.is_empty() {
                named.model_id = name.clone();
            }
            if let Err(e) = named.validate() {
                errors.push(ValidationError::Model(name.clone(), e));
            }
        }

        if self.generation.max_attempts == 0 || self.generation.max_attempts > MAX_ATTEMPTS_LIMIT {
            errors.push(ValidationError::Generation(format!(
                "max_attempts must be between 1 and {} (got {})",
                MAX_ATTEMPTS_LIMIT, self.generation.max_attempts
            )));
        }

        if self.conversation.window == 0 {
            errors.push(ValidationError::Conversation(
                "window must keep at least one turn".to_string(),
            ));
        }

        // Model references only make sense once the bindings themselves are valid.
        if errors.is_empty() {
            if let Ok(registry) = BindingRegistry::from_config(self) {
                if !registry.contains(&self.default_model) {
                    errors.push(ValidationError::Model(
                        self.default_model.clone(),
                        "default_model does not name a configured model".to_string(),
                    ));
                }
                let fallback = &self.generation.fallback;
                if fallback.enabled {
                    if fallback.primary == fallback.fallback {
                        errors.push(ValidationError::Generation(
                            "fallback model must differ from the primary model".to_string(),
                        ));
                    }
                    for id in [&fallback.primary, &fallback.fallback] {
                        if !registry.contains(id) {
                            errors.push(ValidationError::Generation(format!(
                                "fallback references unknown model '{}'",
                                id
                            )));
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one `ConfigError`.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// The active prompt template: the configured file, else the built-in one.
    pub fn prompt_template(&self, workspace_root: &Path) -> Result<PromptTemplate, ApiError> {
        match &self.prompt.template_path {
            Some(path) if path.is_absolute() => PromptTemplate::from_file(path),
            Some(path) => PromptTemplate::from_file(&workspace_root.join(path)),
            None => Ok(PromptTemplate::builtin()),
        }
    }
}
