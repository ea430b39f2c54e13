//! Config loading facade: one entry point that applies sources in precedence order.

use super::merge::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::AppConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest first): defaults, global file, `config/config.toml`,
    /// `config/{SKILLPLAN_ENV}.toml`.
    pub fn load(workspace_root: &Path) -> Result<AppConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()?
            .try_deserialize()
    }

    /// Global configuration path, if `XDG_CONFIG_HOME` or `HOME` is set.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
