pub mod list;
pub mod scripts;

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

use crate::config::Catalogs;
use crate::error::{InstallOutcome, RunReport};
use crate::exec::{CommandRunner, CommandSpec, Privilege};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manager {
    Apt,
    Snap,
}

impl Manager {
    pub fn program(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Snap => "snap",
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Runs package-manager installs, one child process per package.
pub struct Dispatcher<'a> {
    pub runner: &'a dyn CommandRunner,
    pub privilege: Privilege,
    pub catalogs: &'a Catalogs,
}

impl Dispatcher<'_> {
    pub fn install_command(&self, manager: Manager, package: &str) -> CommandSpec {
        let command = self
            .privilege
            .command(manager.program())
            .args(["install", package]);
        match manager {
            Manager::Apt => command.arg("-y"),
            Manager::Snap if self.catalogs.is_classic(package) => command.arg("--classic"),
            Manager::Snap => command,
        }
    }

    /// A failed package is reported and the loop moves on.
    pub fn install_apps(
        &self,
        out: &mut dyn Write,
        manager: Manager,
        packages: &[String],
    ) -> io::Result<RunReport> {
        let mut report = RunReport::default();
        for package in packages {
            writeln!(out, "Installing {package} via {manager}...")?;
            out.flush()?;

            let outcome: InstallOutcome = self
                .runner
                .run(&self.install_command(manager, package))
                .into();
            match &outcome {
                InstallOutcome::Failure(err) => {
                    warn!(%manager, package = package.as_str(), error = %err, "install failed");
                    writeln!(out, "Failed to install {package}: {err}")?;
                }
                _ => writeln!(out, "{package} installed successfully.")?,
            }
            report.record(package.as_str(), outcome);
        }
        Ok(report)
    }
}
