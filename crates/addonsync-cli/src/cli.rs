use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Blender Addon Synchronization Tool
///
/// Install addon sources into Blender by copy or symlink, or pack them into release archives
#[derive(Parser, Debug)]
#[command(name = "addonsync")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overwrite existing archives without prompting
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Use specific config file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "ADDONSYNC_CONFIG",
        conflicts_with = "no_config"
    )]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy addon sources into the Blender addon directory
    Install(InstallArgs),

    /// Symlink addon sources into the Blender addon directory
    Symlink(InstallArgs),

    /// Pack addons into zip archives named from their bl_info
    Pack(PackArgs),

    /// Show the effective configuration
    Config,
}

/// Options shared by every command that reads addon sources
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory where addon sources are located
    #[arg(long, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    /// Addon to leave out (file extension included); repeatable
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub excluded: Vec<String>,

    /// Also delete files with this suffix before the operation; repeatable
    #[arg(long = "remove-suffix", value_name = "SUFFIX")]
    pub remove_suffixes: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Blender addon installation directory
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Remove build artifacts from the sources first
    #[arg(long)]
    pub clean: bool,

    /// Path to the Blender executable
    #[arg(long = "host-exe", value_name = "PATH")]
    pub host_exe: Option<PathBuf>,

    /// Start Blender afterwards with the addons enabled
    #[arg(long)]
    pub reload: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PackArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for archives
    #[arg(long, value_name = "DIR")]
    pub release_dir: Option<PathBuf>,

    /// Also require the blender compatibility field in bl_info
    #[arg(long)]
    pub strict: bool,
}
