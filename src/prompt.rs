//! Prompt assets: plan requests, categories, and the plan template.
//!
//! A [`PlanRequest`] is the validated, immutable input of one submission. The
//! [`PromptTemplate`] turns it into the text sent to a model provider.

mod category;
mod request;
mod template;

pub use category::Category;
pub use request::{
    PlanFields, PlanRequest, MAX_DAILY_HOURS, MAX_DAYS, MIN_DAILY_HOURS, MIN_DAYS,
};
pub use template::{PromptTemplate, PLACEHOLDERS};

/// Temperature used when no language-specific default applies.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Languages offered for plan output, with the creativity default for each.
pub const LANGUAGE_TEMPERATURES: &[(&str, f32)] = &[
    ("English", 0.7),
    ("Spanish", 0.8),
    ("French", 0.75),
    ("German", 0.6),
    ("Hindi", 0.85),
    ("Chinese", 0.65),
    ("Japanese", 0.7),
    ("Gujarati", 0.1),
];

/// Look up the default temperature for a language (case-insensitive).
pub fn language_temperature(language: &str) -> Option<f32> {
    LANGUAGE_TEMPERATURES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language.trim()))
        .map(|(_, temperature)| *temperature)
}

/// Mean of the per-language defaults for the selected languages.
///
/// Unknown languages count as [`DEFAULT_TEMPERATURE`]; an empty selection
/// yields [`DEFAULT_TEMPERATURE`].
pub fn default_temperature(languages: &[String]) -> f32 {
    if languages.is_empty() {
        return DEFAULT_TEMPERATURE;
    }
    let sum: f32 = languages
        .iter()
        .map(|language| language_temperature(language).unwrap_or(DEFAULT_TEMPERATURE))
        .sum();
    sum / languages.len() as f32
}
