use super::common::RunOptions;
use super::install::{self, InstallMode};
use crate::cli::InstallArgs;

pub struct Symlink;

impl Symlink {
    pub fn execute(args: &InstallArgs, options: &RunOptions) -> anyhow::Result<bool> {
        install::run(args, options, InstallMode::Link)
    }
}
