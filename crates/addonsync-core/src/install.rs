//! Installation into the addon directory
//!
//! Both install styles share the same lifecycle: [`Installer::clear_old`]
//! removes whatever is installed under the addon names, then each addon is
//! either copied ([`Installer`]) or linked ([`Symlinker`]).

mod copy;
mod symlink;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub use symlink::Symlinker;
use tracing::debug;

use crate::error::{IoResultExt, Result};
use crate::report::BatchResult;
use crate::scanner::{AddonKind, AddonUnit};

/// Copies addon sources into an install directory
#[derive(Debug, Clone)]
pub struct Installer {
    install_dir: PathBuf,
}

impl Installer {
    /// Create an installer targeting `install_dir`
    #[must_use]
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// Delete entries directly under the install directory named in `names`
    ///
    /// Symlinks are unlinked without touching their targets. Entries with
    /// other names are left alone, and finding nothing to delete is not an
    /// error. `processed` in the result counts deleted entries.
    #[must_use]
    pub fn clear_old<S: AsRef<str>>(&self, names: &[S]) -> BatchResult {
        clear_old(&self.install_dir, names)
    }

    /// Copy one addon into the install directory under its own name
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be copied.
    pub fn install(&self, unit: &AddonUnit) -> Result<PathBuf> {
        let dest = self.install_dir.join(&unit.name);

        match unit.kind {
            AddonKind::File => copy::copy_file(&unit.path, &dest)?,
            AddonKind::Package => copy::copy_directory(&unit.path, &dest)?,
        }

        debug!(addon = %unit.name, dest = %dest.display(), "installed");
        Ok(dest)
    }

    /// Copy every unit, continuing past failures
    #[must_use]
    pub fn install_all(&self, units: &[AddonUnit]) -> BatchResult {
        let mut result = BatchResult::default();
        for unit in units {
            result.record(&unit.name, self.install(unit));
        }
        result
    }
}

/// Delete entries directly under `install_dir` named in `names`
#[must_use]
pub fn clear_old<S: AsRef<str>>(install_dir: &Path, names: &[S]) -> BatchResult {
    let mut result = BatchResult::default();
    let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();

    let entries = match fs::read_dir(install_dir).at(install_dir) {
        Ok(entries) => entries,
        Err(e) => {
            result.record::<()>(&install_dir.display().to_string(), Err(e));
            return result;
        }
    };

    for entry in entries {
        let entry = match entry.at(install_dir) {
            Ok(entry) => entry,
            Err(e) => {
                result.record::<()>(&install_dir.display().to_string(), Err(e));
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if wanted.contains(name.as_str()) {
            result.record(&name, remove_entry(&entry.path()));
        }
    }

    result
}

/// Remove a file, directory tree, or symlink (never following it)
pub(crate) fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).at(path)?;

    if metadata.is_symlink() {
        // directory links on Windows need remove_dir
        fs::remove_file(path)
            .or_else(|_| fs::remove_dir(path))
            .at(path)?;
    } else if metadata.is_dir() {
        fs::remove_dir_all(path).at(path)?;
    } else {
        fs::remove_file(path).at(path)?;
    }

    debug!(path = %path.display(), "removed old install");
    Ok(())
}
