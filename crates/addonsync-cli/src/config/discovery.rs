//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Python project file that may carry a `[tool.addonsync]` table
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Nearest pyproject.toml
    pub project: Option<PathBuf>,
    /// Global config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Files from lowest to highest precedence
    pub fn in_merge_order(&self) -> impl Iterator<Item = &Path> {
        [&self.global, &self.project, &self.cli]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// An explicit `cli_path` is kept even if it does not exist, so reading
    /// it later reports the mistake instead of silently ignoring it.
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let start = std::env::current_dir().ok();

        ConfigFiles {
            cli: cli_path.map(Path::to_path_buf),
            project: start.and_then(|dir| Self::find_file(dir, PYPROJECT_FILE)),
            global: Self::find_global_config(),
        }
    }

    /// Find a file in `start` or its parent directories
    fn find_file(start: PathBuf, name: &str) -> Option<PathBuf> {
        let mut current = start;

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find global config in the platform config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("addonsync").join("config.toml");

        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config));

        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_keeps_missing_cli_config() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nonexistent.toml");

        let files = ConfigDiscovery::discover(Some(&missing));

        assert_eq!(files.cli, Some(missing));
    }

    #[test]
    fn test_find_file_walks_up() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PYPROJECT_FILE), "").unwrap();

        let found = ConfigDiscovery::find_file(nested, PYPROJECT_FILE);

        assert_eq!(found, Some(tmp.path().join(PYPROJECT_FILE)));
    }

    #[test]
    fn test_merge_order() {
        let files = ConfigFiles {
            cli: Some(PathBuf::from("cli.toml")),
            project: None,
            global: Some(PathBuf::from("global.toml")),
        };

        let order: Vec<&Path> = files.in_merge_order().collect();

        assert_eq!(order, vec![Path::new("global.toml"), Path::new("cli.toml")]);
    }

    // Discovery from the current directory is not tested directly to avoid
    // std::env::set_current_dir() leaking between tests.
}
