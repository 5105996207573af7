//! Configuration file discovery, merging, and validation
//!
//! This module handles:
//! - Config file discovery from the CLI flag, the nearest `pyproject.toml`,
//!   and the global config directory
//! - TOML parsing with serde, reading `[tool.addonsync]` where present
//! - Merging with precedence rules, command-line flags last
//! - Validation of the merged settings

mod discovery;
mod merge;
mod validation;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use validation::ConfigValidator;

use std::path::Path;

use addonsync_core::Settings;
use anyhow::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load settings from config files and apply command-line `overrides`
    ///
    /// With `no_config` set only the overrides are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is invalid or cannot be read, or if
    /// the merged settings fail validation.
    pub fn load(cli_config_path: Option<&Path>, no_config: bool, overrides: Settings) -> Result<Settings> {
        let mut settings = if no_config {
            Settings::default()
        } else {
            let files = ConfigDiscovery::discover(cli_config_path);
            ConfigMerger::merge(&files)?
        };

        ConfigMerger::overlay(&mut settings, overrides);
        ConfigValidator::validate(&settings)?;

        Ok(settings)
    }
}
