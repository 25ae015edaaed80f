//! Process-backed [`CommandRunner`] using `std::process::Command`.

use std::process::Command;

use super::{CommandError, CommandRunner};

/// Runs the tool as a child process and captures its output.
///
/// A fresh process is spawned per call; nothing is kept between calls.
///
/// # Example
///
/// ```no_run
/// use netcfg::command::{CommandRunner, NetshCommand, ProcessRunner};
///
/// let runner = ProcessRunner::new("netsh");
/// let listing = runner.run(&NetshCommand::ShowConfig.args())?;
/// println!("{listing}");
/// # Ok::<(), netcfg::command::CommandError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    /// Creates a runner for the given program (name on `PATH` or full path).
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            // The tool reports most errors on stdout
            let details = if output.stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout)
            } else {
                String::from_utf8_lossy(&output.stderr)
            };
            return Err(CommandError::Failed {
                program: self.program.clone(),
                args: args.to_vec(),
                status: output.status.code(),
                output: details.trim().to_string(),
            });
        }

        // Console code pages are not always UTF-8; keep what we can
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn program(&self) -> &str {
        &self.program
    }
}
