//! CLI parse: clap types for skillplan. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// skillplan CLI - Personalized learning plans from hosted language models
#[derive(Parser)]
#[command(name = "skillplan")]
#[command(about = "Generate personalized skill learning plans with hosted language models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (holds config/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a learning plan, one per requested language
    Generate {
        /// Skill to master
        #[arg(long)]
        skill: String,
        /// Skill category (see `skillplan categories`)
        #[arg(long)]
        category: String,
        /// Total days available
        #[arg(long, default_value = "10")]
        days: u32,
        /// Daily time commitment in hours
        #[arg(long, default_value = "2")]
        hours: u32,
        /// Output language; repeat for several plans (default: English)
        #[arg(long = "language")]
        languages: Vec<String>,
        /// Model id (default: configured default_model)
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature in 0.0..=1.0 (default: derived from the languages)
        #[arg(long)]
        temperature: Option<f32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Chat about a plan; reads one message per line from stdin
    Chat {
        /// Model id (default: configured default_model)
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature in 0.0..=1.0
        #[arg(long)]
        temperature: Option<f32>,
        /// Number of past turns to keep (default: conversation.window)
        #[arg(long)]
        window: Option<usize>,
    },
    /// List model bindings and whether their credentials are set
    Models {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List skill categories
    Categories,
    /// Print the active prompt template
    Template,
}
