//! Core error types for the addonsync library

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using [`AddonError`]
pub type Result<T> = std::result::Result<T, AddonError>;

/// Windows `ERROR_PRIVILEGE_NOT_HELD`, returned when symlink creation needs
/// developer mode or an elevated shell.
#[cfg(windows)]
const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

/// Errors raised by the core components
#[derive(Debug, Error)]
pub enum AddonError {
    /// Discovery found nothing to process
    #[error("there are no addon sources inside the directory {} ({skipped} entries skipped)", dir.display())]
    NoAddonsFound {
        /// Scanned source directory
        dir: PathBuf,
        /// Number of children that were looked at and skipped
        skipped: usize,
    },

    /// Entry file has no parsable `bl_info` block
    #[error("no bl_info found in {}: {reason}", path.display())]
    MetadataNotFound {
        /// Entry file that was inspected
        path: PathBuf,
        /// What went wrong while locating or parsing the block
        reason: String,
    },

    /// A key needed to name the archive is absent
    #[error("<{key}> does not exist in the addon bl_info dictionary, it is required to generate the ZIP file name")]
    MissingMetadataField {
        /// Missing key
        key: &'static str,
    },

    /// A key is present but holds the wrong kind of value
    #[error("bl_info <{key}> should be {expected}, found {found}")]
    InvalidMetadataField {
        /// Offending key
        key: &'static str,
        /// Expected shape of the value
        expected: &'static str,
        /// Rendering of the actual value
        found: String,
    },

    /// Filesystem refused the operation
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The user declined to replace an existing archive
    #[error("overwrite of {} declined", path.display())]
    OverwriteDeclined {
        /// Existing archive path
        path: PathBuf,
    },

    /// An addon path does not live under the source root used for archive paths
    #[error("{} is not inside source root {}", path.display(), root.display())]
    OutsideSourceRoot {
        /// Addon path
        path: PathBuf,
        /// Source root
        root: PathBuf,
    },

    /// Any other I/O failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Directory traversal failure
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Zip writer failure
    #[error("failed to write archive {}: {source}", path.display())]
    Archive {
        /// Archive being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: zip::result::ZipError,
    },
}

impl AddonError {
    /// Wrap an I/O error, classifying permission failures separately
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if is_permission_error(&source) {
            Self::PermissionDenied { path, source }
        } else {
            Self::Io { path, source }
        }
    }

    /// Whether this is a permission-class failure
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

fn is_permission_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied || is_privilege_error(err)
}

#[cfg(windows)]
fn is_privilege_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD)
}

#[cfg(not(windows))]
const fn is_privilege_error(_err: &io::Error) -> bool {
    false
}

/// Attach a path to I/O results
pub(crate) trait IoResultExt<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| AddonError::io(path, e))
    }
}
