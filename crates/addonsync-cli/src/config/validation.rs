//! Configuration validation and error reporting

use std::path::Path;

use addonsync_core::Settings;
use anyhow::{Result, bail};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate merged settings
    ///
    /// # Errors
    ///
    /// Returns an error if an excluded name or extra suffix is blank.
    pub fn validate(settings: &Settings) -> Result<()> {
        for name in &settings.excluded_names {
            if name.trim().is_empty() {
                bail!("Excluded addon name cannot be empty");
            }
        }

        for suffix in &settings.extra_suffixes {
            if suffix.trim().trim_start_matches('.').is_empty() {
                bail!("Extra suffix cannot be empty");
            }
        }

        Ok(())
    }

    /// Check that a directory a command needs was supplied and exists
    ///
    /// # Errors
    ///
    /// Returns an error naming `key` if the directory is unset or is not a
    /// directory.
    pub fn require_dir<'a>(key: &str, dir: Option<&'a Path>) -> Result<&'a Path> {
        let Some(dir) = dir else {
            bail!("<{key}> cannot be empty.");
        };

        if !dir.is_dir() {
            bail!("<{key}> <{}> is not a valid directory.", dir.display());
        }

        Ok(dir)
    }

    /// Non-fatal problems worth telling the user about
    #[must_use]
    pub fn warnings(settings: &Settings) -> Vec<String> {
        let mut warnings = Vec::new();

        if settings.wants_reload() && settings.host_executable.is_none() {
            warnings.push(
                "<reload-host> is enabled but <host-executable> is not set; Blender will not be loaded."
                    .to_string(),
            );
        }

        warnings
    }
}
