//! Addon discovery for a source directory
//!
//! Only direct children of the source directory are considered:
//! - `name.py`: a single-file addon, valid if its text mentions `bl_info`
//! - `name/`: a package addon, valid if `name/__init__.py` mentions `bl_info`
//!
//! Everything else is reported back as a skipped candidate rather than an
//! error.

mod filters;

use std::fs;
use std::path::{Path, PathBuf};

pub use filters::ExclusionSet;
use tracing::{debug, info};

use crate::error::{AddonError, IoResultExt, Result};

/// Marker token that identifies an addon entry file
pub const METADATA_MARKER: &str = "bl_info";

/// Entry file inside a package addon
pub const PACKAGE_ENTRY_FILE: &str = "__init__.py";

/// Extension of single-file addons (without the dot)
pub const SOURCE_EXTENSION: &str = "py";

/// Shape of an addon on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonKind {
    /// A single `.py` module
    File,
    /// A directory with an `__init__.py`
    Package,
}

/// A discovered addon source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonUnit {
    /// File or directory name, extension preserved for files
    pub name: String,
    /// Path to the file or directory
    pub path: PathBuf,
    /// File or package
    pub kind: AddonKind,
}

impl AddonUnit {
    /// File that carries the `bl_info` block
    #[must_use]
    pub fn entry_file(&self) -> PathBuf {
        match self.kind {
            AddonKind::File => self.path.clone(),
            AddonKind::Package => self.path.join(PACKAGE_ENTRY_FILE),
        }
    }

    /// Name Blender uses to import the addon
    #[must_use]
    pub fn module_name(&self) -> &str {
        match self.kind {
            AddonKind::File => self
                .name
                .strip_suffix(".py")
                .unwrap_or(&self.name),
            AddonKind::Package => &self.name,
        }
    }
}

/// Why a directory child was not treated as an addon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Named in the exclusion set
    Excluded,
    /// Directory without `__init__.py`
    NoEntryFile,
    /// File that is not a `.py` module
    NotPythonSource,
    /// Entry file does not mention `bl_info`
    NoMetadataMarker,
    /// Entry file could not be read as text
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::NoEntryFile => write!(f, "no {PACKAGE_ENTRY_FILE} found"),
            Self::NotPythonSource => write!(f, "not a python module or package"),
            Self::NoMetadataMarker => write!(f, "no {METADATA_MARKER} found"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
        }
    }
}

/// A child that did not qualify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    /// Path of the skipped child
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of classifying one directory child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A usable addon
    Valid(AddonUnit),
    /// Not an addon, or excluded
    Skipped(SkippedCandidate),
}

/// Result of scanning a source directory
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Addons found, sorted by name
    pub units: Vec<AddonUnit>,
    /// Children that were passed over
    pub skipped: Vec<SkippedCandidate>,
}

impl Discovery {
    /// Names of the discovered units
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name.clone()).collect()
    }
}

/// Source directory scanner
pub struct Scanner;

impl Scanner {
    /// Scan the direct children of `source_dir` for addons
    ///
    /// # Errors
    ///
    /// Returns [`AddonError::NoAddonsFound`] if nothing qualifies, or an I/O
    /// error if the directory itself cannot be listed.
    pub fn discover(source_dir: &Path, exclusions: &ExclusionSet) -> Result<Discovery> {
        let mut discovery = Discovery::default();

        for entry in fs::read_dir(source_dir).at(source_dir)? {
            let entry = entry.at(source_dir)?;

            match Self::classify(&entry.path(), exclusions) {
                Candidate::Valid(unit) => {
                    debug!(addon = %unit.name, "found addon source");
                    discovery.units.push(unit);
                }
                Candidate::Skipped(skipped) => {
                    info!(path = %skipped.path.display(), reason = %skipped.reason, "skipping");
                    discovery.skipped.push(skipped);
                }
            }
        }

        if discovery.units.is_empty() {
            return Err(AddonError::NoAddonsFound {
                dir: source_dir.to_path_buf(),
                skipped: discovery.skipped.len(),
            });
        }

        discovery.units.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(discovery)
    }

    /// Decide whether a single path is an addon
    #[must_use]
    pub fn classify(path: &Path, exclusions: &ExclusionSet) -> Candidate {
        let skip = |reason| {
            Candidate::Skipped(SkippedCandidate {
                path: path.to_path_buf(),
                reason,
            })
        };

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return skip(SkipReason::NotPythonSource);
        };

        if exclusions.contains(&name) {
            return skip(SkipReason::Excluded);
        }

        let (kind, entry_file) = if path.is_dir() {
            let init = path.join(PACKAGE_ENTRY_FILE);
            if !init.is_file() {
                return skip(SkipReason::NoEntryFile);
            }
            (AddonKind::Package, init)
        } else if path.is_file() && path.extension().is_some_and(|e| e == SOURCE_EXTENSION) {
            (AddonKind::File, path.to_path_buf())
        } else {
            return skip(SkipReason::NotPythonSource);
        };

        match fs::read_to_string(&entry_file) {
            Ok(text) if text.contains(METADATA_MARKER) => Candidate::Valid(AddonUnit {
                name,
                path: path.to_path_buf(),
                kind,
            }),
            Ok(_) => skip(SkipReason::NoMetadataMarker),
            Err(e) => skip(SkipReason::Unreadable(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_module(dir: &Path, name: &str, with_marker: bool) {
        let body = if with_marker {
            r#"bl_info = {"name": "Test", "version": (0, 5, 0)}"#
        } else {
            "import bpy\n"
        };
        fs::write(dir.join(name), body).unwrap();
    }

    fn write_package(dir: &Path, name: &str, with_marker: bool) {
        let pkg = dir.join(name);
        fs::create_dir(&pkg).unwrap();
        write_module(&pkg, PACKAGE_ENTRY_FILE, with_marker);
    }

    #[test]
    fn test_discover_scenario() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "moduleA.py", true);
        write_module(tmp.path(), "moduleB.py", false);
        write_package(tmp.path(), "pkgC", true);

        let discovery = Scanner::discover(tmp.path(), &ExclusionSet::default()).unwrap();

        assert_eq!(discovery.names(), vec!["moduleA.py", "pkgC"]);
        assert_eq!(discovery.skipped.len(), 1);
        assert_eq!(discovery.skipped[0].reason, SkipReason::NoMetadataMarker);
        assert_eq!(discovery.units[0].kind, AddonKind::File);
        assert_eq!(discovery.units[1].kind, AddonKind::Package);
    }

    #[test]
    fn test_discover_counts_only_qualifying() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "valid_module.py", true);
        write_module(tmp.path(), "valid_module_2.py", true);
        write_module(tmp.path(), "invalid_module.py", false);
        write_package(tmp.path(), "valid_package", true);
        write_package(tmp.path(), "invalid_package", false);
        fs::write(tmp.path().join("notes.txt"), "bl_info").unwrap();
        fs::create_dir(tmp.path().join("empty_dir")).unwrap();

        let discovery = Scanner::discover(tmp.path(), &ExclusionSet::default()).unwrap();

        assert_eq!(discovery.units.len(), 3);
        assert_eq!(discovery.skipped.len(), 4);
    }

    #[test]
    fn test_discover_respects_exclusions() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "keep.py", true);
        write_module(tmp.path(), "drop.py", true);
        write_package(tmp.path(), "drop_pkg", true);

        let exclusions = ExclusionSet::from_names(["drop.py", "drop_pkg"]);
        let discovery = Scanner::discover(tmp.path(), &exclusions).unwrap();

        assert_eq!(discovery.names(), vec!["keep.py"]);
        assert!(
            discovery
                .skipped
                .iter()
                .all(|s| s.reason == SkipReason::Excluded)
        );
    }

    #[test]
    fn test_discover_empty_result_is_error() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "plain.py", false);

        let err = Scanner::discover(tmp.path(), &ExclusionSet::default()).unwrap_err();

        match err {
            AddonError::NoAddonsFound { skipped, .. } => assert_eq!(skipped, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_package_without_init() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("loose");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("module.py"), "bl_info = {}").unwrap();

        let candidate = Scanner::classify(&pkg, &ExclusionSet::default());

        assert!(matches!(
            candidate,
            Candidate::Skipped(SkippedCandidate {
                reason: SkipReason::NoEntryFile,
                ..
            })
        ));
    }

    #[test]
    fn test_module_name() {
        let file = AddonUnit {
            name: "my_tool.py".to_string(),
            path: PathBuf::from("/src/my_tool.py"),
            kind: AddonKind::File,
        };
        let package = AddonUnit {
            name: "my_pkg".to_string(),
            path: PathBuf::from("/src/my_pkg"),
            kind: AddonKind::Package,
        };

        assert_eq!(file.module_name(), "my_tool");
        assert_eq!(package.module_name(), "my_pkg");
        assert_eq!(package.entry_file(), PathBuf::from("/src/my_pkg/__init__.py"));
    }
}
