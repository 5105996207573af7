//! `bl_info` extraction
//!
//! The block is located with a regex on the `bl_info = {` assignment and
//! then read with a literal-only parser. Addon code is never imported or
//! evaluated, so extraction has no side effects and works for addons whose
//! imports are unavailable outside Blender.

mod literal;

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

pub use literal::{ParseError, Value, parse_prefix};
use regex::Regex;
use tracing::debug;

use crate::error::{AddonError, IoResultExt, Result};
use crate::scanner::PACKAGE_ENTRY_FILE;

/// Key holding the addon display name
pub const NAME_KEY: &str = "name";
/// Key holding the addon version tuple
pub const VERSION_KEY: &str = "version";
/// Key holding the minimum Blender version tuple
pub const COMPATIBILITY_KEY: &str = "blender";

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*bl_info[ \t]*=[ \t]*\{").expect("bl_info pattern is valid")
});

/// Parsed `bl_info` dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, Value)>,
}

impl Metadata {
    /// Build from string keys and values
    #[must_use]
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up a key; later duplicates win, as in a Python dict literal
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Addon display name, if it is a string
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Addon version components, if they are integers
    #[must_use]
    pub fn version(&self) -> Option<Vec<i64>> {
        self.get(VERSION_KEY).and_then(Value::as_int_sequence)
    }

    /// Minimum Blender version components, if they are integers
    #[must_use]
    pub fn compatibility(&self) -> Option<Vec<i64>> {
        self.get(COMPATIBILITY_KEY).and_then(Value::as_int_sequence)
    }

    /// All keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Read the `bl_info` block of an addon file or package directory
///
/// # Errors
///
/// Returns [`AddonError::MetadataNotFound`] when the block is missing or is
/// not a literal dict with string keys, and an I/O error when the entry file
/// cannot be read.
pub fn extract_metadata(addon_path: &Path) -> Result<Metadata> {
    let entry_file = if addon_path.is_dir() {
        addon_path.join(PACKAGE_ENTRY_FILE)
    } else {
        addon_path.to_path_buf()
    };

    let text = fs::read_to_string(&entry_file).at(&entry_file)?;
    let metadata = parse_metadata(&text).map_err(|reason| AddonError::MetadataNotFound {
        path: entry_file.clone(),
        reason,
    })?;

    debug!(path = %entry_file.display(), keys = metadata.entries.len(), "read bl_info");
    Ok(metadata)
}

/// Find and parse the `bl_info` block in source text
///
/// # Errors
///
/// Returns a description of the failure when no block can be read.
pub fn parse_metadata(text: &str) -> std::result::Result<Metadata, String> {
    let Some(found) = ASSIGNMENT.find(text) else {
        return Err("no `bl_info = {...}` assignment".to_string());
    };

    // the match ends just past the opening brace
    let block = &text[found.end() - 1..];
    let (value, _) = parse_prefix(block).map_err(|e| format!("bl_info is not a literal: {e}"))?;

    let Value::Dict(pairs) = value else {
        return Err("bl_info is not a dict".to_string());
    };

    let entries = pairs
        .into_iter()
        .map(|(k, v)| match k {
            Value::Str(key) => Ok((key, v)),
            other => Err(format!("bl_info key {other} is not a string")),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Metadata { entries })
}
