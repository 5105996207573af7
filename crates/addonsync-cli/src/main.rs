mod cli;
mod commands;
mod config;
mod host;
mod interactive;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::RunOptions;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = RunOptions::new(cli.verbose, cli.yes, cli.config.as_deref(), cli.no_config);

    let success = match &cli.command {
        Commands::Install(args) => {
            commands::Install::execute(args, &options).context("Failed to execute install command")?
        }
        Commands::Symlink(args) => {
            commands::Symlink::execute(args, &options).context("Failed to execute symlink command")?
        }
        Commands::Pack(args) => {
            commands::Pack::execute(args, &options).context("Failed to execute pack command")?
        }
        Commands::Config => {
            commands::Config::execute(&options).context("Failed to execute config command")?;
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
