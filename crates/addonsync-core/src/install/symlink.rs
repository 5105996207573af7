//! Symlink installation
//!
//! Links let Blender load an addon straight from its source tree, so edits
//! show up on the next reload without reinstalling.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IoResultExt, Result};
use crate::report::BatchResult;
use crate::scanner::AddonUnit;

/// Creates symlinks to addon sources inside an install directory
#[derive(Debug, Clone)]
pub struct Symlinker {
    install_dir: PathBuf,
}

impl Symlinker {
    /// Create a symlinker targeting `install_dir`
    #[must_use]
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// Link `install_dir/<name>` to `addon_path`
    ///
    /// The link target is the canonical absolute source path, so relative
    /// source directories still resolve from inside the install directory.
    /// An existing entry at the destination is not removed here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AddonError::PermissionDenied`] when the platform
    /// refuses to create links, or an I/O error otherwise.
    pub fn link(&self, addon_path: &Path) -> Result<PathBuf> {
        let target = dunce::canonicalize(addon_path).at(addon_path)?;
        let Some(name) = addon_path.file_name().or_else(|| target.file_name()) else {
            return Err(crate::AddonError::io(
                addon_path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "addon path has no name"),
            ));
        };
        let link = self.install_dir.join(name);

        create_link(&target, &link).at(&link)?;

        debug!(link = %link.display(), target = %target.display(), "created symlink");
        Ok(link)
    }

    /// Link every unit, continuing past failures
    #[must_use]
    pub fn link_all(&self, units: &[AddonUnit]) -> BatchResult {
        let mut result = BatchResult::default();
        for unit in units {
            result.record(&unit.name, self.link(&unit.path));
        }
        result
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
