//! External network-configuration tool invocation.
//!
//! This module provides:
//! - The [`CommandRunner`] trait, the seam every caller goes through
//! - A process-backed implementation ([`ProcessRunner`])
//! - Typed argument lists for the tool's subcommands ([`NetshCommand`])

mod netsh;
mod process;

#[cfg(test)]
pub mod mock;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use netsh::NetshCommand;
pub use process::ProcessRunner;

use std::sync::Arc;

use thiserror::Error;

/// Error type for external command execution.
///
/// Captured output is kept for diagnostics only; nothing parses it.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started at all.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program that was being launched
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited with a non-zero status.
    #[error("'{program} {}' exited with {}: {output}", .args.join(" "), status_text(.status))]
    Failed {
        /// Program that was run
        program: String,
        /// Arguments passed to the program
        args: Vec<String>,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured stderr (or stdout when stderr is empty)
        output: String,
    },

    /// The listing command succeeded but printed nothing that parses into an adapter.
    #[error("'{program}' produced no usable adapter listing")]
    NoUsableOutput {
        /// Program that was run
        program: String,
    },
}

fn status_text(status: &Option<i32>) -> String {
    status.map_or_else(|| "no exit code".to_string(), |code| format!("status {code}"))
}

/// Runs the network-configuration tool with an argument list.
///
/// Calls are blocking and run to completion; no timeout is imposed.
/// Implementations must report a non-zero exit as [`CommandError::Failed`].
pub trait CommandRunner: Send + Sync {
    /// Runs the tool and returns its captured stdout on success.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the tool cannot be started and
    /// [`CommandError::Failed`] if it exits unsuccessfully.
    fn run(&self, args: &[String]) -> Result<String, CommandError>;

    /// Name of the tool, used in diagnostics.
    fn program(&self) -> &str;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        (**self).run(args)
    }

    fn program(&self) -> &str {
        (**self).program()
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        self.as_ref().run(args)
    }

    fn program(&self) -> &str {
        self.as_ref().program()
    }
}
