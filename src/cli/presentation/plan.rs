//! Plan and chat-reply presentation.

use crate::generation::{FailureReason, GenerationResult};
use serde_json::json;

/// One tagged line, e.g. `error[transient]: ... (after 3 attempts)`.
pub fn format_failure(reason: FailureReason, attempts: u32, detail: &str) -> String {
    if attempts == 0 {
        format!("error[{}]: {}", reason.tag(), detail)
    } else {
        format!(
            "error[{}]: {} (after {} attempt{})",
            reason.tag(),
            detail,
            attempts,
            if attempts == 1 { "" } else { "s" }
        )
    }
}

/// Markdown for a success, tagged error line for a failure.
pub fn format_reply(result: &GenerationResult) -> String {
    match result {
        GenerationResult::Success { text, .. } => text.clone(),
        GenerationResult::Failure {
            reason,
            attempts,
            detail,
        } => format_failure(*reason, *attempts, detail),
    }
}

pub fn format_plan_results_text(results: &[(String, GenerationResult)]) -> String {
    results
        .iter()
        .map(|(language, result)| format!("## Plan in {}\n\n{}\n", language, format_reply(result)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_plan_results_json(results: &[(String, GenerationResult)]) -> String {
    let plans: Vec<_> = results
        .iter()
        .map(|(language, result)| json!({ "language": language, "result": result }))
        .collect();
    let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
    let out = json!({ "plans": plans, "total": results.len(), "failed": failed });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
