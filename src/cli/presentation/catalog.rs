//! Model and category listings.

use crate::prompt::Category;
use crate::provider::{CredentialStatus, ModelBinding};
use serde::Serialize;

/// One row of `skillplan models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelListEntry {
    pub model_id: String,
    pub provider: String,
    pub model: String,
    pub credential_env: String,
    pub credential: CredentialStatus,
    pub endpoint: Option<String>,
    pub is_default: bool,
}

impl ModelListEntry {
    pub fn new(binding: &ModelBinding, credential: CredentialStatus, is_default: bool) -> Self {
        Self {
            model_id: binding.model_id.clone(),
            provider: binding.provider_type.slug().to_string(),
            model: binding.model.clone(),
            credential_env: binding.credential_env().to_string(),
            credential,
            endpoint: binding.endpoint.clone(),
            is_default,
        }
    }
}

pub fn format_models_text(entries: &[ModelListEntry]) -> String {
    if entries.is_empty() {
        return "No models configured.".to_string();
    }
    let mut output = String::from("Available Models:\n");
    for entry in entries {
        let marker = if entry.is_default { "*" } else { " " };
        let status = match entry.credential {
            CredentialStatus::Present => "ready",
            CredentialStatus::Missing => "missing credential",
        };
        output.push_str(&format!(
            "{} {:<20} {:<10} {:<28} {:<18} {}\n",
            marker, entry.model_id, entry.provider, entry.model, entry.credential_env, status
        ));
    }
    output.push_str(&format!("\nTotal: {} model(s); * marks the default\n", entries.len()));
    output
}

pub fn format_models_json(entries: &[ModelListEntry]) -> String {
    let out = serde_json::json!({ "models": entries, "total": entries.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_categories_text() -> String {
    Category::all()
        .iter()
        .map(|category| format!("{:<12} {}", category.name(), category.label()))
        .collect::<Vec<_>>()
        .join("\n")
}
