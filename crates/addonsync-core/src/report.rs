//! Batch outcomes and summary reporting

use std::fmt::Write as _;

use crate::error::AddonError;

/// A unit that failed during a batch
#[derive(Debug)]
pub struct UnitFailure {
    /// Addon name
    pub name: String,
    /// What went wrong
    pub error: AddonError,
}

/// Outcome of running one operation over many addons
///
/// Failures never stop the batch; they are collected here and reported at
/// the end.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Units the operation completed for
    pub processed: usize,
    /// Failed units with their errors
    pub failures: Vec<UnitFailure>,
}

impl BatchResult {
    /// Record a per-unit outcome
    pub fn record<T>(&mut self, name: &str, outcome: crate::Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.processed += 1;
                Some(value)
            }
            Err(error) => {
                tracing::warn!(addon = name, %error, "operation failed");
                self.failures.push(UnitFailure {
                    name: name.to_string(),
                    error,
                });
                None
            }
        }
    }

    /// Fold another batch into this one
    pub fn absorb(&mut self, other: Self) {
        self.processed += other.processed;
        self.failures.extend(other.failures);
    }

    /// Whether every unit succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether any failure was a permission error
    #[must_use]
    pub fn has_permission_failures(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_permission_denied())
    }
}

/// Renders batch results for the console
pub struct BatchReporter;

impl BatchReporter {
    /// Generate a summary report; `verb` names what `processed` counts
    #[must_use]
    pub fn generate_summary(verb: &str, result: &BatchResult) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "\n=== Summary ===");
        let _ = writeln!(output, "{verb}: {}", result.processed);
        let _ = writeln!(output, "Failed:  {}", result.failures.len());

        if !result.failures.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", result.failures.len());
            for failure in &result.failures {
                let _ = writeln!(output, "  - {}: {}", failure.name, failure.error);
            }
        }

        if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}
