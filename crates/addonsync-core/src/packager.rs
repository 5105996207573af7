//! Release archive creation
//!
//! Archives are named from the addon's `bl_info`, e.g.
//! `My Addon (v1.2.0).zip`, and store entries relative to the source root
//! so an addon keeps its position within the source tree.

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AddonError, IoResultExt, Result};
use crate::metadata::{COMPATIBILITY_KEY, Metadata, NAME_KEY, VERSION_KEY, Value};

/// Archive file extension
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Callback asked before an existing archive is replaced
///
/// Return `Ok(true)` to overwrite, `Ok(false)` to keep the existing file, or
/// an error to abort.
pub type OverwriteApprover = Box<dyn FnMut(&Path) -> Result<bool>>;

/// Which `bl_info` keys must be present to name an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldRequirement {
    /// `name` and `version`
    #[default]
    Basic,
    /// `name`, `version` and `blender`
    Strict,
}

impl FieldRequirement {
    /// Keys that must be present
    #[must_use]
    pub const fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &[NAME_KEY, VERSION_KEY],
            Self::Strict => &[NAME_KEY, VERSION_KEY, COMPATIBILITY_KEY],
        }
    }
}

/// Result of packing one addon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Written archive
    pub archive_path: PathBuf,
    /// Number of entries (files and directories) in the archive
    pub entries: usize,
}

/// Packs addon sources into zip archives
pub struct Packager {
    source_root: PathBuf,
    release_dir: PathBuf,
    approver: Option<OverwriteApprover>,
}

impl Packager {
    /// Create a packager
    ///
    /// Entry paths are computed relative to `source_root`; archives are
    /// written to `release_dir`.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, release_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            release_dir: release_dir.into(),
            approver: None,
        }
    }

    /// Ask `approver` before replacing an existing archive
    ///
    /// Without an approver existing archives are overwritten.
    #[must_use]
    pub fn with_overwrite_approver(mut self, approver: OverwriteApprover) -> Self {
        self.approver = Some(approver);
        self
    }

    /// Build the archive name from metadata
    ///
    /// # Errors
    ///
    /// Returns [`AddonError::MissingMetadataField`] when a required key is
    /// absent and [`AddonError::InvalidMetadataField`] when `name` is not a
    /// plain file name or a version is not a sequence of integers.
    pub fn name_for(metadata: &Metadata, requirement: FieldRequirement) -> Result<String> {
        for &key in requirement.required_keys() {
            if !metadata.contains_key(key) {
                return Err(AddonError::MissingMetadataField { key });
            }
        }

        let name = metadata
            .name()
            .map(str::trim)
            .ok_or_else(|| invalid(NAME_KEY, "a string", metadata.get(NAME_KEY)))?;
        if !is_plain_name(name) {
            return Err(invalid(
                NAME_KEY,
                "a name without path separators",
                metadata.get(NAME_KEY),
            ));
        }

        let Some(version) = metadata.version() else {
            return Err(invalid(
                VERSION_KEY,
                "a tuple of integers",
                metadata.get(VERSION_KEY),
            ));
        };

        if requirement == FieldRequirement::Strict && metadata.compatibility().is_none() {
            return Err(invalid(
                COMPATIBILITY_KEY,
                "a tuple of integers",
                metadata.get(COMPATIBILITY_KEY),
            ));
        }

        Ok(format!("{name} (v{})", join_version(&version)))
    }

    /// Write `addon_path` into `<release_dir>/<name>.zip`
    ///
    /// The archive is built in a temporary file next to its destination and
    /// only replaces an existing archive once it is complete. An addon that
    /// is itself a symlink inside the source root is packed under its own
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`AddonError::OverwriteDeclined`] if an existing archive may
    /// not be replaced, [`AddonError::OutsideSourceRoot`] if the addon is not
    /// under the source root, and I/O or archive errors otherwise.
    pub fn pack(&mut self, addon_path: &Path, name: &str) -> Result<PackReport> {
        let file_name = if name.ends_with(ARCHIVE_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{ARCHIVE_EXTENSION}")
        };
        let archive_path = self.release_dir.join(&file_name);
        if !is_plain_name(&file_name) {
            return Err(AddonError::io(
                &archive_path,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "archive name must not contain path separators",
                ),
            ));
        }

        if archive_path.exists() && !self.approve_overwrite(&archive_path)? {
            return Err(AddonError::OverwriteDeclined { path: archive_path });
        }

        let root = dunce::canonicalize(&self.source_root).at(&self.source_root)?;
        let addon = resolve_parent(addon_path)?;
        if !addon.starts_with(&root) {
            return Err(AddonError::OutsideSourceRoot {
                path: addon,
                root,
            });
        }

        let temp = NamedTempFile::new_in(&self.release_dir).at(&self.release_dir)?;
        let own_files: Vec<PathBuf> = [temp.path(), archive_path.as_path()]
            .into_iter()
            .filter_map(|path| dunce::canonicalize(path).ok())
            .collect();
        let mut zip = ZipWriter::new(temp);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let archive_err = |source| AddonError::Archive {
            path: archive_path.clone(),
            source,
        };

        let mut entries = 0;
        for entry in WalkDir::new(&addon).min_depth(usize::from(addon.is_dir())) {
            let entry = entry?;
            let path = entry.path();
            if is_own_file(path, &own_files) {
                continue;
            }

            let entry_name = archive_entry_name(path, &root);
            if entry.file_type().is_dir() {
                zip.add_directory(format!("{entry_name}/"), options)
                    .map_err(archive_err)?;
            } else {
                zip.start_file(entry_name, options).map_err(archive_err)?;
                let mut source = File::open(path).at(path)?;
                io::copy(&mut source, &mut zip).at(path)?;
            }
            entries += 1;
        }

        let temp = zip.finish().map_err(archive_err)?;
        temp.persist(&archive_path)
            .map_err(|e| AddonError::io(&archive_path, e.error))?;

        info!(archive = %archive_path.display(), entries, "packed addon");
        Ok(PackReport {
            archive_path,
            entries,
        })
    }

    fn approve_overwrite(&mut self, archive_path: &Path) -> Result<bool> {
        match self.approver.as_mut() {
            Some(approve) => approve(archive_path),
            None => {
                debug!(archive = %archive_path.display(), "overwriting existing archive");
                Ok(true)
            }
        }
    }
}

fn invalid(key: &'static str, expected: &'static str, found: Option<&Value>) -> AddonError {
    AddonError::InvalidMetadataField {
        key,
        expected,
        found: found.map_or_else(|| "nothing".to_string(), ToString::to_string),
    }
}

/// Render version components as `1.2.3`
fn join_version(parts: &[i64]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether `name` is usable as a single file name
fn is_plain_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        )
}

/// Canonicalize everything but the last component of `path`
///
/// Symlinks in the parent directories are resolved while the addon itself
/// keeps its name even when it is a link.
fn resolve_parent(path: &Path) -> Result<PathBuf> {
    let Some(file_name) = path.file_name() else {
        return Err(AddonError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "addon path has no file name"),
        ));
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = dunce::canonicalize(parent).at(parent)?;
    Ok(parent.join(file_name))
}

/// Whether a walked entry is the archive being written or the one it replaces
fn is_own_file(path: &Path, own_files: &[PathBuf]) -> bool {
    let name = path.file_name();
    own_files
        .iter()
        .any(|own| own.file_name() == name && dunce::canonicalize(path).is_ok_and(|p| &p == own))
}

/// POSIX-style path of `path` relative to `root`
fn archive_entry_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
