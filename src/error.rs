use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    NonZeroExit { command: String, status: String },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl InstallError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of one package or script install, printed and then tallied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Success,
    Skipped,
    Failure(String),
}

impl InstallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<Result<(), InstallError>> for InstallOutcome {
    fn from(result: Result<(), InstallError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => Self::Failure(err.to_string()),
        }
    }
}

/// Outcomes of a whole run, in the order they happened.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<(String, InstallOutcome)>,
}

impl RunReport {
    pub fn record(&mut self, name: impl Into<String>, outcome: InstallOutcome) {
        self.entries.push((name.into(), outcome));
    }

    pub fn extend(&mut self, other: RunReport) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[(String, InstallOutcome)] {
        &self.entries
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.entries()
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(name, _)| name.as_str())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |wanted: fn(&InstallOutcome) -> bool| {
            self.entries.iter().filter(|(_, o)| wanted(o)).count()
        };
        write!(
            f,
            "{} installed, {} already present, {} failed",
            count(|o| matches!(o, InstallOutcome::Success)),
            count(|o| matches!(o, InstallOutcome::Skipped)),
            count(InstallOutcome::is_failure),
        )
    }
}
