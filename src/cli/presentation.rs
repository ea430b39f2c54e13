//! CLI presentation: text and json formatters per command family.

mod catalog;
mod plan;

pub use catalog::{
    format_categories_text, format_models_json, format_models_text, ModelListEntry,
};
pub use plan::{format_failure, format_plan_results_json, format_plan_results_text, format_reply};
