//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Stable command name used in log events (e.g. "generate", "models").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate { .. } => "generate",
        Commands::Chat { .. } => "chat",
        Commands::Models { .. } => "models",
        Commands::Categories => "categories",
        Commands::Template => "template",
    }
}
