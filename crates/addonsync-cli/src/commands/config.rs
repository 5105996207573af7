use addonsync_core::Settings;
use anyhow::Context;

use super::common::RunOptions;
use crate::config::{ConfigDiscovery, ConfigFiles};

pub struct Config;

impl Config {
    /// Print where settings come from and what they resolve to
    pub fn execute(options: &RunOptions) -> anyhow::Result<()> {
        let files = if options.no_config {
            ConfigFiles::default()
        } else {
            ConfigDiscovery::discover(options.config_path)
        };

        println!("=== Config Files ===");
        print_source("CLI", files.cli.as_deref(), options.no_config);
        print_source("Project", files.project.as_deref(), options.no_config);
        print_source("Global", files.global.as_deref(), options.no_config);
        println!();

        let settings = options.settings(Settings::default())?;
        let rendered =
            toml::to_string_pretty(&settings).context("Failed to render effective settings")?;

        println!("=== Effective Settings ===");
        print!("{rendered}");

        Ok(())
    }
}

fn print_source(label: &str, path: Option<&std::path::Path>, disabled: bool) {
    match path {
        Some(path) => println!("{label}: {}", path.display()),
        None if disabled => println!("{label}: (disabled)"),
        None => println!("{label}: (not found)"),
    }
}
