//! Build artifact removal
//!
//! `__pycache__` directories and `.pyc` files are always removed. Callers
//! can add more suffixes (`.blend1`, `.tmp`, ...) through [`SuffixSet`].

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{IoResultExt, Result};

/// Build cache directory name
pub const CACHE_DIR_NAME: &str = "__pycache__";

/// Compiled artifact suffix
pub const COMPILED_SUFFIX: &str = ".pyc";

/// File suffixes to remove, always including [`COMPILED_SUFFIX`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSet {
    suffixes: BTreeSet<String>,
}

impl Default for SuffixSet {
    fn default() -> Self {
        Self {
            suffixes: BTreeSet::from([COMPILED_SUFFIX.to_string()]),
        }
    }
}

impl SuffixSet {
    /// Default set plus `extra`; suffixes may be given with or without the dot
    #[must_use]
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for suffix in extra {
            let suffix = suffix.as_ref().trim();
            if suffix.is_empty() || suffix == "." {
                continue;
            }
            if suffix.starts_with('.') {
                set.suffixes.insert(suffix.to_string());
            } else {
                set.suffixes.insert(format!(".{suffix}"));
            }
        }
        set
    }

    /// Whether the file's last extension is in the set
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.suffixes.contains(&format!(".{}", ext.to_string_lossy())))
    }

    /// Iterate the suffixes, dot included
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }
}

/// Removes build artifacts from addon trees
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    suffixes: SuffixSet,
}

impl Cleaner {
    /// Create a cleaner for the given suffixes
    #[must_use]
    pub const fn new(suffixes: SuffixSet) -> Self {
        Self { suffixes }
    }

    /// Remove cache directories and matching files under `addon_path`
    ///
    /// Returns how many entries were removed. A removed cache directory
    /// counts once regardless of its contents. A single-file addon has no
    /// tree to clean and yields 0.
    ///
    /// # Errors
    ///
    /// Returns an error if traversal or removal fails.
    pub fn clean(&self, addon_path: &Path) -> Result<usize> {
        let mut removed = 0;
        let mut walker = WalkDir::new(addon_path).min_depth(1).into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() && entry.file_name() == CACHE_DIR_NAME {
                walker.skip_current_dir();
                fs::remove_dir_all(path).at(path)?;
                debug!(path = %path.display(), "removed cache directory");
                removed += 1;
            } else if !file_type.is_dir() && self.suffixes.matches(path) {
                fs::remove_file(path).at(path)?;
                debug!(path = %path.display(), "removed artifact");
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Clean `addon_path` with the default suffixes plus `extra_suffixes`
///
/// # Errors
///
/// Returns an error if traversal or removal fails.
pub fn clean<S: AsRef<str>>(addon_path: &Path, extra_suffixes: &[S]) -> Result<usize> {
    Cleaner::new(SuffixSet::with_extra(extra_suffixes)).clean(addon_path)
}
