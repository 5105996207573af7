use addonsync_core::{BatchReporter, BatchResult, Installer, Settings, Symlinker};

use super::common::{self, RunOptions};
use crate::cli::InstallArgs;
use crate::config::ConfigValidator;

/// How sources end up in the install directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Copy files and trees
    Copy,
    /// Link to the sources
    Link,
}

impl InstallMode {
    const fn title(self) -> &'static str {
        match self {
            Self::Copy => "Install Tool Settings",
            Self::Link => "Symlink Tool Settings",
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Copy => "Installed",
            Self::Link => "Linked",
        }
    }
}

pub struct Install;

impl Install {
    pub fn execute(args: &InstallArgs, options: &RunOptions) -> anyhow::Result<bool> {
        run(args, options, InstallMode::Copy)
    }
}

/// Clear old installs, then copy or link every discovered addon
///
/// Returns whether every addon was handled without error.
pub fn run(args: &InstallArgs, options: &RunOptions, mode: InstallMode) -> anyhow::Result<bool> {
    let settings = options.settings(overrides(args))?;

    common::print_settings(
        mode.title(),
        &[
            ("Addon Sources Directory", common::show(settings.source_dir.as_deref())),
            ("Addon Install Directory", common::show(settings.install_dir.as_deref())),
            ("Excluded Addons", format!("{:?}", settings.excluded_names)),
            ("Clean Sources", args.clean.to_string()),
            ("Blender Executable", common::show(settings.host_executable.as_deref())),
            ("Reload Blender", settings.wants_reload().to_string()),
        ],
    );

    let source_dir =
        ConfigValidator::require_dir("source-dir", settings.source_dir.as_deref())?;
    let install_dir =
        ConfigValidator::require_dir("install-dir", settings.install_dir.as_deref())?;

    let discovery = common::discover(source_dir, &settings, options.verbose)?;
    let mut result = BatchResult::default();

    let units = if args.clean {
        let (removed, cleaned) = common::clean_units(discovery.units, &settings, &mut result);
        if removed > 0 {
            println!("Garbage Cleaning: {removed} files removed.");
        }
        cleaned
    } else {
        discovery.units
    };

    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    let cleared = Installer::new(install_dir).clear_old(&names);
    if options.verbose {
        println!("Removed {} old install(s)", cleared.processed);
    }
    let cleared_ok = cleared.is_success();
    result.failures.extend(cleared.failures);

    let installed = match mode {
        InstallMode::Copy => Installer::new(install_dir).install_all(&units),
        InstallMode::Link => Symlinker::new(install_dir).link_all(&units),
    };
    if mode == InstallMode::Link && installed.has_permission_failures() {
        eprintln!("You do not have permission to create symlinks.");
    }
    result.absorb(installed);

    println!("{}", BatchReporter::generate_summary(mode.verb(), &result));

    // only reload when the old copies are really gone
    if cleared_ok {
        common::maybe_reload(&settings, &units);
    }

    if result.is_success() {
        println!("Done!");
    }

    Ok(result.is_success())
}

fn overrides(args: &InstallArgs) -> Settings {
    Settings {
        install_dir: args.install_dir.clone(),
        host_executable: args.host_exe.clone(),
        reload_host: args.reload.then_some(true),
        ..args.source.overrides()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_from_flags() {
        let args = InstallArgs {
            source: SourceArgs {
                src_dir: Some(PathBuf::from("src")),
                excluded: vec!["old.py".to_string()],
                remove_suffixes: Vec::new(),
            },
            install_dir: Some(PathBuf::from("addons")),
            clean: true,
            host_exe: None,
            reload: false,
        };

        let settings = overrides(&args);

        assert_eq!(settings.source_dir, Some(PathBuf::from("src")));
        assert_eq!(settings.install_dir, Some(PathBuf::from("addons")));
        assert_eq!(settings.excluded_names, vec!["old.py"]);
        // an unset --reload must not override a config file
        assert_eq!(settings.reload_host, None);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(InstallMode::Copy.verb(), "Installed");
        assert_eq!(InstallMode::Link.title(), "Symlink Tool Settings");
    }
}
