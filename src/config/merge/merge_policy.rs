//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Sources added later override these keys; tables merge key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("default_model", crate::config::DEFAULT_MODEL)?
        .set_default("generation.max_attempts", crate::config::DEFAULT_MAX_ATTEMPTS as i64)?
        .set_default("generation.backoff_ms", crate::config::DEFAULT_BACKOFF_MS as i64)?
        .set_default("conversation.window", crate::config::DEFAULT_CONVERSATION_WINDOW as i64)
}
