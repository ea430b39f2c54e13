//! Orchestrator: binding resolution, bounded retries, and fallback.
//!
//! Every path through [`Orchestrator::generate`] and [`Orchestrator::converse`]
//! ends in a [`GenerationResult`]; provider and configuration problems found at
//! submission time are reported there rather than as `Err`.

use super::backoff::{Backoff, TokioBackoff};
use super::policy::{FallbackRule, RetryPolicy};
use super::result::{FailureReason, GenerationResult};
use crate::config::AppConfig;
use crate::conversation::ConversationContext;
use crate::error::ApiError;
use crate::prompt::{PlanRequest, PromptTemplate};
use crate::provider::{
    BindingRegistry, ChatMessage, ClientFactory, CompletionOptions, CredentialSource,
    ModelBinding, ModelProviderClient, ProviderFactory,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct Orchestrator {
    registry: Arc<BindingRegistry>,
    factory: Arc<dyn ClientFactory>,
    credentials: Arc<dyn CredentialSource>,
    template: PromptTemplate,
    default_model: String,
    policy: RetryPolicy,
    fallback: Option<FallbackRule>,
    backoff: Arc<dyn Backoff>,
}

impl Orchestrator {
    /// Create an orchestrator with the default retry policy and no fallback.
    ///
    /// Fails when `default_model` is unknown or its credential is not set.
    pub fn new(
        registry: Arc<BindingRegistry>,
        factory: Arc<dyn ClientFactory>,
        credentials: Arc<dyn CredentialSource>,
        template: PromptTemplate,
        default_model: &str,
    ) -> Result<Self, ApiError> {
        let binding = registry.get_or_error(default_model)?;
        if credentials.get(binding.credential_env()).is_none() {
            return Err(ApiError::ProviderNotConfigured(format!(
                "Model '{}' needs {} to be set",
                default_model,
                binding.credential_env()
            )));
        }

        Ok(Self {
            registry,
            factory,
            credentials,
            template,
            default_model: default_model.to_string(),
            policy: RetryPolicy::default(),
            fallback: None,
            backoff: Arc::new(TokioBackoff),
        })
    }

    /// Wire up HTTP clients, retry policy, fallback, and template from configuration.
    pub fn from_config(
        config: &AppConfig,
        workspace_root: &Path,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, ApiError> {
        let registry = Arc::new(BindingRegistry::from_config(config)?);
        let template = config.prompt_template(workspace_root)?;
        let orchestrator = Self::new(
            registry,
            Arc::new(ProviderFactory),
            credentials,
            template,
            &config.default_model,
        )?
        .with_policy(RetryPolicy::from_config(&config.generation));

        Ok(match FallbackRule::from_config(&config.generation.fallback) {
            Some(rule) => orchestrator.with_fallback(rule),
            None => orchestrator,
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fallback(mut self, rule: FallbackRule) -> Self {
        self.fallback = Some(rule);
        self
    }

    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Render the plan prompt for `request` and run it against the request's model.
    pub async fn generate(&self, request: &PlanRequest) -> GenerationResult {
        let prompt = self.template.render(request);
        debug!(
            model_id = request.model_id(),
            language = request.language(),
            prompt_chars = prompt.len(),
            "Rendered plan prompt"
        );
        self.run(
            request.model_id(),
            request.temperature(),
            vec![ChatMessage::user(prompt)],
        )
        .await
    }

    /// One plan per language, strictly in order; each finishes its retries before the next starts.
    pub async fn generate_batch(
        &self,
        base: &PlanRequest,
        languages: &[String],
    ) -> Vec<(String, GenerationResult)> {
        let mut results = Vec::with_capacity(languages.len());
        for (index, language) in languages.iter().enumerate() {
            info!(
                language = language.as_str(),
                position = index + 1,
                total = languages.len(),
                "Generating plan"
            );
            let result = match base.for_language(language) {
                Ok(request) => self.generate(&request).await,
                Err(e) => GenerationResult::failure(FailureReason::Fatal, 0, e.to_string()),
            };
            results.push((language.clone(), result));
        }
        results
    }

    /// Send one chat turn. On success the exchange is appended to `context`;
    /// on failure `context` is left as it was.
    pub async fn converse(
        &self,
        model_id: &str,
        temperature: f32,
        context: &mut ConversationContext,
        user_message: &str,
    ) -> GenerationResult {
        let messages = context.messages_for(user_message);
        let result = self.run(model_id, temperature, messages).await;
        if let GenerationResult::Success { text, .. } = &result {
            context.push_turn(user_message, text.clone());
        }
        result
    }

    async fn run(&self, model_id: &str, temperature: f32, messages: Vec<ChatMessage>) -> GenerationResult {
        let (binding, client) = match self.resolve_client(model_id) {
            Ok(resolved) => resolved,
            Err(failure) => return failure,
        };

        let options = CompletionOptions {
            temperature: Some(temperature),
            max_tokens: binding.max_tokens,
        };
        self.attempt(&binding.model_id, client.as_ref(), messages, options)
            .await
    }

    /// Binding plus a constructed client, substituting the fallback once if the
    /// primary client cannot be built.
    fn resolve_client(
        &self,
        model_id: &str,
    ) -> Result<(&ModelBinding, Box<dyn ModelProviderClient>), GenerationResult> {
        let binding = self.lookup_binding(model_id)?;
        let api_key = self.credential_for(binding)?;

        let construct_error = match self.factory.create_client(binding, api_key) {
            Ok(client) => return Ok((binding, client)),
            Err(e) => e,
        };

        let rule = match &self.fallback {
            Some(rule) if rule.applies_to(model_id) => rule,
            _ => {
                error!(model_id, error = %construct_error, "Failed to construct provider client");
                return Err(GenerationResult::failure(
                    FailureReason::Fatal,
                    0,
                    construct_error.to_string(),
                ));
            }
        };

        warn!(
            model_id,
            fallback = rule.fallback.as_str(),
            error = %construct_error,
            "Primary model unavailable; using fallback"
        );
        let fallback = self.lookup_binding(&rule.fallback)?;
        let api_key = self.credential_for(fallback)?;
        match self.factory.create_client(fallback, api_key) {
            Ok(client) => Ok((fallback, client)),
            Err(e) => {
                error!(model_id = fallback.model_id.as_str(), error = %e, "Fallback model unavailable");
                Err(GenerationResult::failure(
                    FailureReason::Fatal,
                    0,
                    format!(
                        "Primary model '{}' failed ({}); fallback '{}' failed ({})",
                        model_id, construct_error, fallback.model_id, e
                    ),
                ))
            }
        }
    }

    fn lookup_binding(&self, model_id: &str) -> Result<&ModelBinding, GenerationResult> {
        self.registry.get_or_error(model_id).map_err(|e| {
            error!(model_id, "Unknown model id");
            GenerationResult::failure(FailureReason::Fatal, 0, e.to_string())
        })
    }

    fn credential_for(&self, binding: &ModelBinding) -> Result<String, GenerationResult> {
        self.credentials.get(binding.credential_env()).ok_or_else(|| {
            warn!(
                model_id = binding.model_id.as_str(),
                env = binding.credential_env(),
                "Credential missing"
            );
            GenerationResult::failure(
                FailureReason::AuthMissing,
                0,
                format!(
                    "{} is not set; model '{}' cannot be used",
                    binding.credential_env(),
                    binding.model_id
                ),
            )
        })
    }

    async fn attempt(
        &self,
        model_id: &str,
        client: &dyn ModelProviderClient,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> GenerationResult {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            debug!(
                model_id,
                provider = client.provider_name(),
                attempt,
                max_attempts,
                "Calling provider"
            );

            match client.complete(messages.clone(), options.clone()).await {
                Ok(response) => {
                    info!(
                        model_id,
                        attempt,
                        finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                        "Provider returned text"
                    );
                    return GenerationResult::Success {
                        text: response.content.trim().to_string(),
                        attempts: attempt,
                        model_id: model_id.to_string(),
                    };
                }
                Err(err) if err.is_transient() => {
                    last_error = err.to_string();
                    if attempt < max_attempts {
                        let delay_ms = self.policy.backoff.as_millis() as u64;
                        warn!(
                            model_id,
                            attempt,
                            delay_ms,
                            error = %err,
                            "Transient provider error; retrying"
                        );
                        self.backoff.pause(self.policy.backoff).await;
                    }
                }
                Err(err) => {
                    error!(model_id, attempt, kind = %err.kind, error = %err, "Provider call failed");
                    return GenerationResult::failure(FailureReason::Fatal, attempt, err.to_string());
                }
            }
        }

        error!(model_id, attempts = max_attempts, "Retry limit reached");
        GenerationResult::failure(
            FailureReason::Transient,
            max_attempts,
            format!("Gave up after {} attempts: {}", max_attempts, last_error),
        )
    }
}
