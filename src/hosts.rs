//! Hosts file editing.
//!
//! Opens the system hosts file in an external editor and waits for it to
//! close. netcfg never parses or rewrites the file itself.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::command::CommandError;

/// Launches an editor on the hosts file.
///
/// # Example
///
/// ```no_run
/// use netcfg::hosts::HostsEditor;
///
/// HostsEditor::default().open()?;
/// # Ok::<(), netcfg::command::CommandError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsEditor {
    editor: String,
    path: PathBuf,
}

impl HostsEditor {
    /// Default hosts file of the platform.
    #[cfg(windows)]
    pub const DEFAULT_PATH: &'static str = r"C:\Windows\System32\drivers\etc\hosts";
    /// Default hosts file of the platform.
    #[cfg(not(windows))]
    pub const DEFAULT_PATH: &'static str = "/etc/hosts";

    /// Default editor of the platform.
    #[cfg(windows)]
    pub const DEFAULT_EDITOR: &'static str = "notepad.exe";
    /// Default editor of the platform.
    #[cfg(not(windows))]
    pub const DEFAULT_EDITOR: &'static str = "vi";

    /// Creates an editor launcher for `path`.
    #[must_use]
    pub fn new(editor: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            editor: editor.into(),
            path: path.into(),
        }
    }

    /// Returns the editor program.
    #[must_use]
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Returns the hosts file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs the editor on the hosts file and waits for it to exit.
    ///
    /// The editor inherits the terminal, so console editors work too.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the editor cannot be started, or
    /// [`CommandError::Failed`] if it exits with a non-zero status.
    pub fn open(&self) -> Result<(), CommandError> {
        tracing::debug!("Opening {} with {}", self.path.display(), self.editor);

        let status = Command::new(&self.editor)
            .arg(&self.path)
            .status()
            .map_err(|source| CommandError::Spawn {
                program: self.editor.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                program: self.editor.clone(),
                args: vec![self.path.display().to_string()],
                status: status.code(),
                output: String::new(),
            })
        }
    }
}

impl Default for HostsEditor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EDITOR, Self::DEFAULT_PATH)
    }
}
