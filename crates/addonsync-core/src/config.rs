//! Settings handed to the core by its caller
//!
//! The core never looks for configuration itself. The CLI layer builds a
//! [`Settings`] from config files and flags and passes it in by value.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cleaner::SuffixSet;
use crate::scanner::ExclusionSet;

/// Options for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Directory holding addon sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Blender addon installation directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Output directory for packed archives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_dir: Option<PathBuf>,

    /// Addon names to leave out, `.py` included for single-file addons
    #[serde(default)]
    pub excluded_names: Vec<String>,

    /// File suffixes to remove in addition to `.pyc`
    #[serde(default)]
    pub extra_suffixes: Vec<String>,

    /// Path to the Blender executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_executable: Option<PathBuf>,

    /// Relaunch Blender with the addons enabled afterwards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_host: Option<bool>,
}

impl Settings {
    /// Exclusion set built from `excluded_names`
    #[must_use]
    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::from_names(self.excluded_names.iter().cloned())
    }

    /// Suffix set built from `extra_suffixes`
    #[must_use]
    pub fn suffixes(&self) -> SuffixSet {
        SuffixSet::with_extra(&self.extra_suffixes)
    }

    /// Whether a host reload was requested
    #[must_use]
    pub fn wants_reload(&self) -> bool {
        self.reload_host == Some(true)
    }
}
