use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::InstallError;

/// A child process to spawn: program plus arguments, no shell involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `bash -c <body>`, so later lines of the script see earlier side effects.
    pub fn shell(body: &str) -> Self {
        Self::new("bash").arg("-c").arg(body)
    }

    pub fn is_shell(&self) -> bool {
        self.program == "bash" && self.args.first().is_some_and(|arg| arg == "-c")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_shell() {
            return write!(f, "bash -c <script>");
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Every child process goes through here.
pub trait CommandRunner {
    /// Runs with inherited stdio and waits for completion.
    fn run(&self, command: &CommandSpec) -> Result<(), InstallError>;

    /// Runs silently and reports whether the command exited 0.
    fn probe(&self, command: &CommandSpec) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<(), InstallError> {
        debug!(%command, "spawning");
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .map_err(|source| InstallError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(InstallError::NonZeroExit {
                command: command.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn probe(&self, command: &CommandSpec) -> bool {
        debug!(%command, "probing");
        Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Prints what would run; probes always report "not installed".
pub struct DryRunRunner<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> DryRunRunner<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, line: &str) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "{line}");
    }
}

impl<W: Write> CommandRunner for DryRunRunner<W> {
    fn run(&self, command: &CommandSpec) -> Result<(), InstallError> {
        if command.is_shell() {
            self.emit("[dry-run] bash -c <<'SCRIPT'");
            for line in command.args[1..].join(" ").lines() {
                self.emit(&format!("[dry-run]   {}", line.trim()));
            }
            self.emit("[dry-run] SCRIPT");
        } else {
            self.emit(&format!("[dry-run] {command}"));
        }
        Ok(())
    }

    fn probe(&self, command: &CommandSpec) -> bool {
        self.emit(&format!("[dry-run] probe: {command}"));
        false
    }
}

/// Whether install commands need a `sudo` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Root,
    Sudo,
}

impl Privilege {
    pub fn detect() -> Self {
        if nix::unistd::geteuid().is_root() {
            Self::Root
        } else {
            Self::Sudo
        }
    }

    pub fn command(self, program: &str) -> CommandSpec {
        match self {
            Self::Root => CommandSpec::new(program),
            Self::Sudo => CommandSpec::new("sudo").arg(program),
        }
    }
}
