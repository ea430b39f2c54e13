//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::config::{AppConfig, ConfigLoader};
use crate::conversation::ConversationContext;
use crate::error::ApiError;
use crate::generation::Orchestrator;
use crate::prompt::{default_temperature, PlanFields, PlanRequest, DEFAULT_TEMPERATURE};
use crate::provider::{BindingRegistry, CredentialSource, CredentialStatus, EnvCredentials};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::cli::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_categories_text, format_models_json, format_models_text, format_plan_results_json,
    format_plan_results_text, format_reply, ModelListEntry,
};

const DEFAULT_LANGUAGE: &str = "English";

/// Rendered command output plus whether every submission succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }
}

/// Runtime context for CLI execution: workspace, loaded configuration, and credentials.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: AppConfig,
    credentials: Arc<dyn CredentialSource>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        Ok(Self {
            workspace_root,
            config: config.validated()?,
            credentials: Arc::new(EnvCredentials),
        })
    }

    /// Replace the credential source (process environment by default).
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = name, "Running command");

        let result = self.execute_inner(command);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(output) => info!(command = name, success = output.success, duration_ms, "Command finished"),
            Err(e) => warn!(command = name, duration_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Generate {
                skill,
                category,
                days,
                hours,
                languages,
                model,
                temperature,
                format,
            } => {
                check_format(format)?;
                let languages = if languages.is_empty() {
                    vec![DEFAULT_LANGUAGE.to_string()]
                } else {
                    languages.clone()
                };
                let model_id = model
                    .clone()
                    .unwrap_or_else(|| self.config.default_model.clone());
                let base = PlanRequest::new(PlanFields {
                    skill: skill.clone(),
                    category: category.clone(),
                    days: *days,
                    daily_hours: *hours,
                    language: languages[0].clone(),
                    temperature: self.plan_temperature(&model_id, *temperature, &languages),
                    model_id,
                })?;
                self.handle_generate(&base, &languages, format)
            }
            Commands::Chat {
                model,
                temperature,
                window,
            } => self.handle_chat(model.as_deref(), *temperature, *window),
            Commands::Models { format } => self.handle_models(format),
            Commands::Categories => Ok(CommandOutput::ok(format_categories_text())),
            Commands::Template => {
                let template = self.config.prompt_template(&self.workspace_root)?;
                Ok(CommandOutput::ok(template.source().trim_end()))
            }
        }
    }

    /// Sampling temperature configured on the binding for `model_id`, if any.
    fn binding_temperature(&self, model_id: &str) -> Option<f32> {
        self.config
            .models
            .get(model_id)
            .and_then(|binding| binding.default_temperature)
    }

    /// Explicit flag, then the binding's default, then the language average.
    fn plan_temperature(&self, model_id: &str, explicit: Option<f32>, languages: &[String]) -> f32 {
        explicit
            .or_else(|| self.binding_temperature(model_id))
            .unwrap_or_else(|| default_temperature(languages))
    }

    /// Orchestrator whose default model is `model_id`; fails if its credential is missing.
    fn orchestrator_for(&self, model_id: &str) -> Result<Orchestrator, ApiError> {
        let mut config = self.config.clone();
        config.default_model = model_id.to_string();
        Orchestrator::from_config(&config, &self.workspace_root, Arc::clone(&self.credentials))
    }

    fn handle_generate(
        &self,
        base: &PlanRequest,
        languages: &[String],
        format: &str,
    ) -> Result<CommandOutput, ApiError> {
        let orchestrator = self.orchestrator_for(base.model_id())?;
        let runtime = build_runtime()?;
        let results = runtime.block_on(orchestrator.generate_batch(base, languages));

        let success = results.iter().all(|(_, result)| result.is_success());
        let text = if format == "json" {
            format_plan_results_json(&results)
        } else {
            format_plan_results_text(&results)
        };
        Ok(CommandOutput { text, success })
    }

    fn handle_chat(
        &self,
        model: Option<&str>,
        temperature: Option<f32>,
        window: Option<usize>,
    ) -> Result<CommandOutput, ApiError> {
        let model_id = model.unwrap_or(self.config.default_model.as_str());
        let orchestrator = self.orchestrator_for(model_id)?;

        let temperature = temperature
            .or_else(|| self.binding_temperature(model_id))
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ApiError::InvalidRequest(format!(
                "Temperature must be between 0.0 and 1.0 (got {})",
                temperature
            )));
        }

        let mut context =
            ConversationContext::new(window.unwrap_or(self.config.conversation.window));
        if let Some(prompt) = &self.config.conversation.system_prompt {
            context = context.with_system_prompt(prompt.clone());
        }

        let runtime = build_runtime()?;
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let answered = chat_loop(
            &runtime,
            &orchestrator,
            model_id,
            temperature,
            &mut context,
            stdin.lock(),
            stdout.lock(),
        )?;
        info!(model_id, answered, "Chat session ended");
        Ok(CommandOutput::ok(String::new()))
    }

    fn handle_models(&self, format: &str) -> Result<CommandOutput, ApiError> {
        check_format(format)?;
        let registry = BindingRegistry::from_config(&self.config)?;
        let entries: Vec<ModelListEntry> = registry
            .list()
            .into_iter()
            .map(|binding| {
                ModelListEntry::new(
                    binding,
                    CredentialStatus::of(binding, self.credentials.as_ref()),
                    binding.model_id == self.config.default_model,
                )
            })
            .collect();

        Ok(CommandOutput::ok(if format == "json" {
            format_models_json(&entries)
        } else {
            format_models_text(&entries)
        }))
    }
}

fn check_format(format: &str) -> Result<(), ApiError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(ApiError::InvalidRequest(format!(
            "Unknown output format '{}' (expected text or json)",
            other
        ))),
    }
}

fn build_runtime() -> Result<Runtime, ApiError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Read one message per line and print each reply.
///
/// `/reset` clears history, `/exit` stops; blank lines are skipped.
/// Returns the number of turns that got an answer.
fn chat_loop<R: BufRead, W: Write>(
    runtime: &Runtime,
    orchestrator: &Orchestrator,
    model_id: &str,
    temperature: f32,
    context: &mut ConversationContext,
    input: R,
    mut output: W,
) -> Result<usize, ApiError> {
    let mut answered = 0;
    for line in input.lines() {
        let line = line?;
        let message = line.trim();
        match message {
            "" => continue,
            "/exit" => break,
            "/reset" => {
                context.clear();
                writeln!(output, "(history cleared)")?;
                continue;
            }
            _ => {}
        }

        let result = runtime.block_on(orchestrator.converse(model_id, temperature, context, message));
        if result.is_success() {
            answered += 1;
        }
        writeln!(output, "{}\n", format_reply(&result))?;
        output.flush()?;
    }
    Ok(answered)
}
