//! Mock command runner for testing.
//!
//! Records every invocation and answers from canned responses.

use std::sync::Mutex;

use super::{CommandError, CommandRunner};

/// A mock implementation of [`CommandRunner`].
///
/// - `show config` returns the configured listing
/// - any invocation whose joined arguments contain a registered fragment fails
/// - everything else succeeds with empty output
#[derive(Debug, Default)]
pub struct MockRunner {
    listing: Option<String>,
    failures: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockRunner {
    /// Creates a runner with no listing; `show config` fails to spawn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner whose `show config` returns `listing`.
    #[must_use]
    pub fn with_listing(listing: impl Into<String>) -> Self {
        Self {
            listing: Some(listing.into()),
            ..Self::default()
        }
    }

    /// Makes every invocation containing `fragment` exit with status 1.
    #[must_use]
    pub fn failing_on(mut self, fragment: impl Into<String>) -> Self {
        self.failures.push(fragment.into());
        self
    }

    /// Returns all recorded invocations.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (only in test code).
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns recorded invocations other than `show config`.
    #[must_use]
    pub fn mutating_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|args| !args.iter().any(|a| a == "show"))
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(args.to_vec());

        let joined = args.join(" ");
        if self.failures.iter().any(|f| joined.contains(f.as_str())) {
            return Err(CommandError::Failed {
                program: "mock".to_string(),
                args: args.to_vec(),
                status: Some(1),
                output: "The parameter is incorrect.".to_string(),
            });
        }

        if args.iter().any(|a| a == "show") {
            return self.listing.clone().ok_or_else(|| CommandError::Spawn {
                program: "mock".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no listing configured"),
            });
        }

        Ok(String::new())
    }

    fn program(&self) -> &str {
        "mock"
    }
}
