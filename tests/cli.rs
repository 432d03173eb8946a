use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary with `$HOME` pointed at a scratch directory and no terminal attached.
fn appkit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("appkit").expect("Failed to locate appkit binary");
    cmd.env("HOME", home).env_remove("APPKIT_LOG").write_stdin("");
    cmd
}

fn write_user_config(home: &Path, content: &str) {
    let dir = home.join(".config").join("appkit");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn list_prints_default_catalogs() {
    let home = TempDir::new().unwrap();

    appkit(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("APT packages:"))
        .stdout(predicate::str::contains("- openjdk-21-jdk\n"))
        .stdout(predicate::str::contains("- microk8s [classic]\n"))
        .stdout(predicate::str::contains("- docker: Docker\n"));
}

#[test]
fn list_honours_user_config() {
    let home = TempDir::new().unwrap();
    write_user_config(home.path(), "apt = [\"htop\"]\nscripts = [\"termius\"]\n");

    appkit(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("- htop\n"))
        .stdout(predicate::str::contains("- termius: Termius\n"))
        .stdout(predicate::str::contains("- vim\n").not());
}

#[test]
fn help_mentions_flags() {
    let home = TempDir::new().unwrap();

    appkit(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn without_terminal_nothing_is_installed() {
    let home = TempDir::new().unwrap();

    appkit(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the App Installer!"))
        .stdout(predicate::str::contains("Error in selection:"))
        .stdout(predicate::str::contains("APT packages: None"))
        .stdout(predicate::str::contains("SNAP packages: None"))
        .stdout(predicate::str::contains("Shell scripts: None"))
        .stdout(predicate::str::contains("Installation process canceled."))
        .stdout(predicate::str::contains("Installing").not());
}

/// Puts stand-ins for every external tool first on `PATH`; each one logs its name to `spawned.log`.
fn shim_path(dir: &Path) -> (String, PathBuf) {
    let log = dir.join("spawned.log");
    for tool in ["id", "sudo", "apt", "snap", "dpkg", "bash", "docker", "nvim", "fzf", "eza"] {
        let shim = dir.join(tool);
        fs::write(&shim, format!("#!/bin/sh\necho {tool} >> '{}'\n", log.display())).unwrap();
        fs::set_permissions(&shim, fs::Permissions::from_mode(0o755)).unwrap();
    }
    let inherited = std::env::var("PATH").unwrap_or_default();
    (format!("{}:{inherited}", dir.display()), log)
}

#[test]
fn cancelled_run_spawns_no_child_processes() {
    let home = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let (path, log) = shim_path(bin.path());

    appkit(home.path())
        .env("PATH", path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation process canceled."));

    assert!(
        !log.exists(),
        "unexpected child processes: {}",
        fs::read_to_string(&log).unwrap_or_default()
    );
}

#[test]
fn dry_run_cancel_spawns_no_child_processes() {
    let home = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let (path, log) = shim_path(bin.path());

    appkit(home.path())
        .env("PATH", path)
        .args(["--dry-run", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation process canceled."));

    assert!(!log.exists());
}

#[test]
fn strict_cancel_still_exits_zero() {
    let home = TempDir::new().unwrap();

    appkit(home.path())
        .args(["--strict", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation process canceled."))
        .stdout(predicate::str::contains("[dry-run]").not());
}

#[test]
fn invalid_config_exits_one() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    fs::write(&path, "snap = [\"gh\"]\nsnap_classic = [\"code\"]\n").unwrap();

    appkit(home.path())
        .arg("--config")
        .arg(&path)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: invalid config"))
        .stderr(predicate::str::contains("snap_classic"));
}

#[test]
fn missing_explicit_config_exits_one() {
    let home = TempDir::new().unwrap();

    appkit(home.path())
        .args(["--config", "/nonexistent/appkit.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}
