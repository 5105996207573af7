//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Scalars** (directories, executable, `reload-host`): a value from a
//!   higher-precedence source replaces a lower one; unset values never clear
//!   anything
//! - **Arrays** (`excluded-names`, `extra-suffixes`): additive, all values from
//!   all sources are combined without duplicates

use std::fs;
use std::path::Path;

use addonsync_core::Settings;
use anyhow::{Context, Result, bail};

use super::discovery::{ConfigFiles, PYPROJECT_FILE};

/// Table name under `[tool]`
const TOOL_TABLE: &str = "addonsync";

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. pyproject.toml
    /// 3. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Settings> {
        let mut merged = Settings::default();

        for path in files.in_merge_order() {
            let settings = Self::load_file(path)?;
            tracing::debug!(path = %path.display(), "loaded config file");
            Self::overlay(&mut merged, settings);
        }

        Ok(merged)
    }

    /// Apply `top` over `base`
    pub fn overlay(base: &mut Settings, top: Settings) {
        if top.source_dir.is_some() {
            base.source_dir = top.source_dir;
        }
        if top.install_dir.is_some() {
            base.install_dir = top.install_dir;
        }
        if top.release_dir.is_some() {
            base.release_dir = top.release_dir;
        }
        if top.host_executable.is_some() {
            base.host_executable = top.host_executable;
        }
        if top.reload_host.is_some() {
            base.reload_host = top.reload_host;
        }

        extend_unique(&mut base.excluded_names, top.excluded_names);
        extend_unique(&mut base.extra_suffixes, top.extra_suffixes);
    }

    /// Read one config file
    ///
    /// In `pyproject.toml` only `[tool.addonsync]` is read and a missing
    /// table means no settings. Other files use that table if present, or
    /// their top level otherwise.
    fn load_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, is_pyproject(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, pyproject: bool) -> Result<Settings> {
        let document: toml::Table = toml::from_str(content)?;

        let section = document
            .get("tool")
            .and_then(|tool| tool.get(TOOL_TABLE))
            .cloned();

        let table = match section {
            Some(toml::Value::Table(table)) => table,
            Some(_) => bail!("[tool.{TOOL_TABLE}] must be a table"),
            None if pyproject => return Ok(Settings::default()),
            None => document,
        };

        let settings: Settings = toml::Value::Table(table).try_into()?;
        Ok(settings)
    }
}

fn is_pyproject(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == PYPROJECT_FILE)
}

fn extend_unique(base: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !base.contains(&value) {
            base.push(value);
        }
    }
}
