//! # addonsync-core
//!
//! Core library for the Blender addon synchronization tool.
//!
//! This library discovers addon sources (single `.py` modules or packages
//! with an `__init__.py`) that declare a `bl_info` block, strips build
//! artifacts from them, and installs them into an addon directory by copy
//! or symlink, or packs them into release archives named from their
//! metadata.
//!
//! Nothing here reads configuration files, prompts the user, or launches
//! processes. Callers hand in a [`Settings`] value and decide how to report
//! the returned [`BatchResult`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

/// Addon discovery in a source directory
pub mod scanner;

/// `bl_info` extraction from entry files
pub mod metadata;

/// Build artifact removal
pub mod cleaner;

/// Copy and symlink installation
pub mod install;

/// Release archive creation
pub mod packager;

/// Plain settings passed into the core by its caller
pub mod config;

/// Per-unit batch outcomes
pub mod report;

#[cfg(test)]
mod integration_tests;

pub use cleaner::{Cleaner, SuffixSet};
pub use config::Settings;
pub use error::{AddonError, Result};
pub use install::{Installer, Symlinker};
pub use metadata::{Metadata, Value, extract_metadata};
pub use packager::{FieldRequirement, OverwriteApprover, PackReport, Packager};
pub use report::{BatchReporter, BatchResult, UnitFailure};
pub use scanner::{
    AddonKind, AddonUnit, Candidate, Discovery, ExclusionSet, Scanner, SkipReason, SkippedCandidate,
};
