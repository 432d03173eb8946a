use std::collections::BTreeMap;
use std::io::{self, Write};

use include_dir::{Dir, include_dir};
use tracing::warn;

use crate::error::{InstallError, InstallOutcome, RunReport};
use crate::exec::{CommandRunner, CommandSpec};

static SCRIPTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/scripts");

/// Something installable by a presence check plus a shell script.
pub trait Installer {
    fn id(&self) -> &str;

    /// Human-facing name used in progress messages.
    fn label(&self) -> &str;

    fn probe(&self, runner: &dyn CommandRunner) -> bool;

    /// The script body handed to `bash -c`.
    fn script(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    pub id: &'static str,
    pub label: &'static str,
    pub probe: &'static [&'static str],
    pub script: &'static str,
}

impl Installer for ScriptInstaller {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn probe(&self, runner: &dyn CommandRunner) -> bool {
        let Some((program, args)) = self.probe.split_first() else {
            return false;
        };
        runner.probe(&CommandSpec::new(*program).args(args.iter().copied()))
    }

    fn script(&self) -> &str {
        self.script
    }
}

struct Builtin {
    id: &'static str,
    label: &'static str,
    probe: &'static [&'static str],
    asset: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        id: "docker",
        label: "Docker",
        probe: &["docker", "--version"],
        asset: "docker.sh",
    },
    Builtin {
        id: "nvim",
        label: "Neovim",
        probe: &["nvim", "--version"],
        asset: "nvim.sh",
    },
    Builtin {
        id: "fzf",
        label: "fzf",
        probe: &["fzf", "--version"],
        asset: "fzf.sh",
    },
    Builtin {
        id: "eza",
        label: "eza",
        probe: &["eza", "--version"],
        asset: "eza.sh",
    },
    // nvm is a shell function, so it has to be sourced before it can answer.
    Builtin {
        id: "nvm",
        label: "nvm",
        probe: &["bash", "-c", ". \"$HOME/.nvm/nvm.sh\" && nvm --version"],
        asset: "nvm.sh",
    },
    Builtin {
        id: "termius",
        label: "Termius",
        probe: &["dpkg", "-s", "termius-app"],
        asset: "termius.sh",
    },
];

/// Built-in installers whose script asset is embedded in the binary.
pub fn builtin_installers() -> Vec<ScriptInstaller> {
    BUILTINS
        .iter()
        .filter_map(|builtin| {
            let Some(script) = script_asset(builtin.asset) else {
                warn!(asset = builtin.asset, "script asset missing");
                return None;
            };
            Some(ScriptInstaller {
                id: builtin.id,
                label: builtin.label,
                probe: builtin.probe,
                script,
            })
        })
        .collect()
}

pub fn script_asset(name: &str) -> Option<&'static str> {
    SCRIPTS_DIR.get_file(name).and_then(|file| file.contents_utf8())
}

/// Identifier to installer lookup; exact match only.
#[derive(Default)]
pub struct Registry {
    installers: BTreeMap<String, Box<dyn Installer>>,
}

impl Registry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for installer in builtin_installers() {
            registry.register(Box::new(installer));
        }
        registry
    }

    /// Replaces any installer already registered under the same id.
    pub fn register(&mut self, installer: Box<dyn Installer>) {
        self.installers.insert(installer.id().to_string(), installer);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Installer> {
        self.installers.get(id).map(AsRef::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.installers.keys().map(String::as_str)
    }
}

pub fn run_shell_scripts(
    registry: &Registry,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
    selection: &[String],
) -> io::Result<RunReport> {
    let mut report = RunReport::default();
    for id in selection {
        writeln!(out, "Running shell script for {id}...")?;
        let Some(installer) = registry.get(id) else {
            warn!(id = id.as_str(), "no installer registered");
            writeln!(out, "No installation script defined for {id}.")?;
            continue;
        };
        let outcome = install(installer, runner, out)?;
        report.record(id.as_str(), outcome);
    }
    Ok(report)
}

/// Probe first; the script only runs when the probe fails.
pub fn install(
    installer: &dyn Installer,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> io::Result<InstallOutcome> {
    let label = installer.label();
    if installer.probe(runner) {
        writeln!(out, "{label} is already installed.")?;
        return Ok(InstallOutcome::Skipped);
    }

    writeln!(out, "Installing {label}...")?;
    run_shell_script(runner, out, installer.script(), label)
}

pub fn run_shell_script(
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
    body: &str,
    label: &str,
) -> io::Result<InstallOutcome> {
    out.flush()?;
    let result = runner.run(&CommandSpec::shell(body));
    report_outcome(out, label, result)
}

fn report_outcome(
    out: &mut dyn Write,
    label: &str,
    result: Result<(), InstallError>,
) -> io::Result<InstallOutcome> {
    match result {
        Ok(()) => {
            writeln!(out, "{label} installed successfully.")?;
            Ok(InstallOutcome::Success)
        }
        Err(err) => {
            warn!(label, error = %err, "script install failed");
            writeln!(out, "Failed to install {label}: {err}")?;
            Ok(InstallOutcome::Failure(err.to_string()))
        }
    }
}
