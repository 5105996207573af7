//! Addon exclusion by name

use std::collections::BTreeSet;

/// Names of addons to leave out of an operation
///
/// Names are compared against the file or directory name exactly, so
/// single-file addons must be listed with their `.py` extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Create an empty exclusion set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any list of names
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` is excluded
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether nothing is excluded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_excludes_nothing() {
        let set = ExclusionSet::new();
        assert!(set.is_empty());
        assert!(!set.contains("anything.py"));
    }

    #[test]
    fn test_exact_name_match() {
        let set = ExclusionSet::from_names(["tool.py", "pkg"]);

        assert!(set.contains("tool.py"));
        assert!(set.contains("pkg"));
        assert!(!set.contains("tool"));
        assert!(!set.contains("pkg.py"));
    }
}
