//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod init;
pub mod propagate;
pub mod sync;
pub mod watch;

use crate::watcher::BatchReport;

/// Human-readable batch summary on stderr.
pub(crate) fn print_report(report: &BatchReport) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    if let Some(path) = &report.manifest {
        eprintln!("Generated {}", path.display());
    }
}
