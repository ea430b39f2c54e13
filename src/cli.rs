//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the orchestrator.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_categories_text, format_failure, format_models_json, format_models_text,
    format_plan_results_json, format_plan_results_text, format_reply, ModelListEntry,
};
pub use route::{CommandOutput, RunContext};
