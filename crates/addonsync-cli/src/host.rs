//! Relaunching Blender with freshly installed addons enabled

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Starts the host application in the background
pub struct HostLauncher {
    executable: PathBuf,
}

impl HostLauncher {
    /// Create a launcher for `executable`
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Host executable path
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Python expression enabling each module in order
    #[must_use]
    pub fn enable_expression<S: AsRef<str>>(modules: &[S]) -> String {
        let mut expression = String::from("import bpy; ");
        for module in modules {
            expression.push_str("bpy.ops.preferences.addon_enable(module='");
            expression.push_str(module.as_ref());
            expression.push_str("'); ");
        }
        expression
    }

    /// Build the launch command without running it
    #[must_use]
    pub fn command<S: AsRef<str>>(&self, modules: &[S]) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("--background")
            .arg("--python-expr")
            .arg(Self::enable_expression(modules))
            .stdin(Stdio::null());
        command
    }

    /// Spawn the host and return without waiting for it
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    #[allow(clippy::zombie_processes)]
    pub fn reload<S: AsRef<str>>(&self, modules: &[S]) -> Result<()> {
        let child = self
            .command(modules)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.executable.display()))?;

        tracing::debug!(pid = child.id(), "started host");
        Ok(())
    }
}
