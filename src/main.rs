mod app;
mod config;
mod error;
mod exec;
mod install;
mod ui;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::error::RunReport;
use crate::exec::{CommandRunner, DryRunRunner, Privilege, SystemRunner};
use crate::install::scripts::Registry;
use crate::ui::DialoguerPrompter;

#[derive(Debug, Parser)]
#[command(
    name = "appkit",
    version,
    about = "Pick apt, snap and script-installed apps, then install them"
)]
struct Cli {
    /// Catalog override file (defaults to ~/.config/appkit/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 1 if any install failed
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the selectable catalogs
    List,
}

fn main() {
    init_tracing();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("APPKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// `Ok(false)` only when `--strict` is set and something failed.
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    let catalogs = config::load(cli.config.as_deref())?;
    let registry = Registry::builtin();
    debug!(?catalogs, "catalogs loaded");

    let mut stdout = io::stdout();

    if let Some(Commands::List) = cli.command {
        install::list::run(&mut stdout, &catalogs, &registry)?;
        return Ok(true);
    }

    let system = SystemRunner;
    let dry_run = DryRunRunner::new(io::stdout());
    let runner: &dyn CommandRunner = if cli.dry_run { &dry_run } else { &system };

    let app = App {
        catalogs: &catalogs,
        registry: &registry,
        runner,
        privilege: Privilege::detect(),
    };
    let report = app.run(&mut DialoguerPrompter, &mut stdout)?;

    Ok(exit_ok(cli.strict, report.as_ref()))
}

/// A cancelled run has no report and always exits cleanly.
fn exit_ok(strict: bool, report: Option<&RunReport>) -> bool {
    !(strict && report.is_some_and(RunReport::has_failures))
}
