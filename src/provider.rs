//! Model Provider Abstraction
//!
//! Unified interface over the hosted text-generation APIs (Google Gemini, OpenAI,
//! Anthropic). Every client reports failures as a [`ProviderError`] whose
//! [`ProviderErrorKind`] tells the caller whether retrying can help; callers never
//! inspect `reqwest` errors directly.

use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod anthropic;
pub mod binding;
pub mod credentials;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use binding::{BindingRegistry, ModelBinding, ProviderType};
pub use credentials::{CredentialSource, CredentialStatus, EnvCredentials, StaticCredentials};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: Option<f32>, // 0.0-1.0
    pub max_tokens: Option<u32>,
}

/// Token usage information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

/// Whether a failed call is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Upstream server-side failure (HTTP 5xx); expected to clear on retry.
    Transient,
    /// Credential rejected by the provider.
    Auth,
    /// Anything else: bad request, unreachable host, malformed body.
    Fatal,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Transient => f.write_str("transient"),
            ProviderErrorKind::Auth => f.write_str("auth"),
            ProviderErrorKind::Fatal => f.write_str("fatal"),
        }
    }
}

/// Classified transport failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} provider error: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Transient,
            status: None,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Auth,
            status: None,
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Fatal,
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let kind = classify_status(status);
        let message = match kind {
            ProviderErrorKind::Transient => format!("Upstream server error ({}): {}", status, body),
            ProviderErrorKind::Auth => format!("Authentication failed ({}): {}", status, body),
            ProviderErrorKind::Fatal => format!("Request failed ({}): {}", status, body),
        };
        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ProviderErrorKind::Transient
    }
}

/// Map an HTTP status to an error kind. Only server-side errors are transient.
pub fn classify_status(status: u16) -> ProviderErrorKind {
    match status {
        500..=599 => ProviderErrorKind::Transient,
        401 | 403 => ProviderErrorKind::Auth,
        _ => ProviderErrorKind::Fatal,
    }
}

// Helper function to map reqwest send errors to ProviderError
fn map_http_error(error: reqwest::Error) -> ProviderError {
    if let Some(status) = error.status() {
        ProviderError::from_status(status.as_u16(), error.to_string())
    } else if error.is_timeout() {
        ProviderError::fatal(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ProviderError::fatal(format!("Connection error: {}", error))
    } else {
        ProviderError::fatal(format!("HTTP error: {}", error))
    }
}

/// Turn a response into `T`, classifying non-success statuses.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ProviderError::from_status(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::fatal(format!("Failed to parse response: {}", e)))
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// Validate an endpoint override and strip its trailing slash.
fn normalize_base_url(base_url: Option<String>, default: &str) -> Result<String, ApiError> {
    let url = match base_url {
        Some(url) => url,
        None => return Ok(default.to_string()),
    };
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::ConfigError(format!(
            "Endpoint must start with http:// or https://: {}",
            url
        )));
    }
    Ok(trimmed.to_string())
}

/// Model provider client trait
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Generate a completion from a list of messages
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Constructs provider clients for bindings.
///
/// The orchestrator only talks to this trait, so tests can substitute scripted
/// clients without touching the network.
pub trait ClientFactory: Send + Sync {
    fn create_client(
        &self,
        binding: &ModelBinding,
        api_key: String,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError>;
}

/// Provider factory for creating HTTP provider clients
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFactory;

impl ClientFactory for ProviderFactory {
    fn create_client(
        &self,
        binding: &ModelBinding,
        api_key: String,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        match binding.provider_type {
            ProviderType::Gemini => Ok(Box::new(GeminiClient::new(
                binding.model.clone(),
                api_key,
                binding.endpoint.clone(),
            )?)),
            ProviderType::OpenAI => Ok(Box::new(OpenAIClient::new(
                binding.model.clone(),
                api_key,
                binding.endpoint.clone(),
            )?)),
            ProviderType::Anthropic => Ok(Box::new(AnthropicClient::new(
                binding.model.clone(),
                api_key,
                binding.endpoint.clone(),
            )?)),
        }
    }
}
