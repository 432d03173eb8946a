use std::io::{self, Write};

use tracing::info;

use crate::config::Catalogs;
use crate::error::RunReport;
use crate::exec::{CommandRunner, Privilege};
use crate::install::scripts::{self, Registry};
use crate::install::{Dispatcher, Manager};
use crate::ui::{self, Prompter};

pub struct App<'a> {
    pub catalogs: &'a Catalogs,
    pub registry: &'a Registry,
    pub runner: &'a dyn CommandRunner,
    pub privilege: Privilege,
}

impl App<'_> {
    /// One interactive pass: select, confirm, install. `None` when cancelled.
    pub fn run(
        &self,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<Option<RunReport>> {
        writeln!(out, "Welcome to the App Installer!")?;

        let apt = ui::multi_select(
            prompter,
            out,
            "Select APT packages to install:",
            &self.catalogs.apt,
        )?;
        let snap = ui::multi_select(
            prompter,
            out,
            "Select SNAP packages to install:",
            &self.catalogs.snap,
        )?;
        let shell = ui::multi_select(
            prompter,
            out,
            "Select shell scripts to execute:",
            &self.catalogs.scripts,
        )?;

        if !ui::confirm(prompter, out, &apt, &snap, &shell)? {
            writeln!(out, "Installation process canceled.")?;
            return Ok(None);
        }
        info!(apt = apt.len(), snap = snap.len(), scripts = shell.len(), "installing");

        let dispatcher = Dispatcher {
            runner: self.runner,
            privilege: self.privilege,
            catalogs: self.catalogs,
        };
        let mut report = RunReport::default();

        if apt.is_empty() {
            writeln!(out, "No APT packages selected. Skipping.")?;
        } else {
            report.extend(dispatcher.install_apps(out, Manager::Apt, &apt)?);
        }

        if snap.is_empty() {
            writeln!(out, "No SNAP packages selected. Skipping.")?;
        } else {
            report.extend(dispatcher.install_apps(out, Manager::Snap, &snap)?);
        }

        if shell.is_empty() {
            writeln!(out, "No shell scripts selected. Skipping.")?;
        } else {
            report.extend(scripts::run_shell_scripts(self.registry, self.runner, out, &shell)?);
        }

        writeln!(out, "\nInstallation completed!")?;
        if !report.is_empty() {
            writeln!(out, "{report}")?;
        }
        let failed = report.failures().collect::<Vec<_>>();
        if !failed.is_empty() {
            writeln!(out, "Failed: {}", failed.join(", "))?;
        }

        Ok(Some(report))
    }
}
