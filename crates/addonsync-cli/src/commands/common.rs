//! Common types and utilities for command execution

use std::fmt::Debug;
use std::path::Path;

use addonsync_core::{AddonUnit, BatchResult, Cleaner, Discovery, Scanner, Settings, UnitFailure};
use anyhow::Context;

use crate::cli::SourceArgs;
use crate::config::{ConfigManager, ConfigValidator};
use crate::host::HostLauncher;

/// Execution options shared by every command
pub struct RunOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Overwrite without prompting
    pub yes_all: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
}

impl<'a> RunOptions<'a> {
    /// Create new run options
    #[must_use]
    pub const fn new(
        verbose: bool,
        yes_all: bool,
        config_path: Option<&'a Path>,
        no_config: bool,
    ) -> Self {
        Self {
            verbose,
            yes_all,
            config_path,
            no_config,
        }
    }

    /// Load settings from config files with `overrides` from flags on top
    ///
    /// Warnings from validation are printed to stderr.
    pub fn settings(&self, overrides: Settings) -> anyhow::Result<Settings> {
        let settings = ConfigManager::load(self.config_path, self.no_config, overrides)
            .context("Failed to load configuration")?;

        for warning in ConfigValidator::warnings(&settings) {
            eprintln!("Warning: {warning}");
        }

        Ok(settings)
    }
}

impl SourceArgs {
    /// Settings carried by the source flags
    #[must_use]
    pub fn overrides(&self) -> Settings {
        Settings {
            source_dir: self.src_dir.clone(),
            excluded_names: self.excluded.clone(),
            extra_suffixes: self.remove_suffixes.clone(),
            ..Settings::default()
        }
    }
}

/// Print a titled block of `label = value` lines
pub fn print_settings(title: &str, rows: &[(&str, String)]) {
    println!("=== {title} ===");
    for (label, value) in rows {
        println!("{label} = {value}");
    }
    println!();
}

/// Render an optional value the way the settings block shows it
pub fn show<T: Debug>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| format!("{v:?}"))
}

/// Discover addons under `source_dir`, reporting skipped entries
pub fn discover(source_dir: &Path, settings: &Settings, verbose: bool) -> anyhow::Result<Discovery> {
    let discovery = Scanner::discover(source_dir, &settings.exclusions())
        .with_context(|| format!("Failed to scan {}", source_dir.display()))?;

    for skipped in &discovery.skipped {
        let name = skipped
            .path
            .file_name()
            .map_or_else(|| skipped.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        println!("Skipping <{name}>, {}.", skipped.reason);
    }

    if verbose {
        println!("Found {} addon(s): {}", discovery.units.len(), discovery.names().join(", "));
    }

    Ok(discovery)
}

/// Remove build artifacts from every unit, recording failures in `result`
///
/// Returns how many entries were removed in total and the units that were
/// cleaned successfully; a unit that failed to clean is not processed further.
pub fn clean_units(
    units: Vec<AddonUnit>,
    settings: &Settings,
    result: &mut BatchResult,
) -> (usize, Vec<AddonUnit>) {
    let cleaner = Cleaner::new(settings.suffixes());
    let mut removed = 0;
    let mut cleaned = Vec::with_capacity(units.len());

    for unit in units {
        match cleaner.clean(&unit.path) {
            Ok(count) => {
                removed += count;
                cleaned.push(unit);
            }
            Err(error) => {
                tracing::warn!(addon = %unit.name, %error, "cleaning failed");
                result.failures.push(UnitFailure {
                    name: unit.name,
                    error,
                });
            }
        }
    }

    (removed, cleaned)
}

/// Relaunch the host with `units` enabled if reload was requested
pub fn maybe_reload(settings: &Settings, units: &[AddonUnit]) {
    if !settings.wants_reload() {
        return;
    }

    let Some(executable) = settings.host_executable.as_deref() else {
        println!("Blender will not be loaded.");
        return;
    };

    let launcher = HostLauncher::new(executable);
    let modules: Vec<&str> = units.iter().map(AddonUnit::module_name).collect();

    println!("Starting {} with {} addon(s) enabled", launcher.executable().display(), modules.len());
    if let Err(e) = launcher.reload(&modules) {
        eprintln!("Warning: {e:#}");
    }
}
