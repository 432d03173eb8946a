use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InstallError;

pub const DEFAULT_APT: &[&str] = &[
    "adb",
    "fastboot",
    "curl",
    "vim",
    "git",
    "net-tools",
    "bat",
    "subversion",
    "vlc",
    "build-essential",
    "repo",
    "meld",
    "ckermit",
    "openssh-server",
    "openjdk-11-jdk",
    "openjdk-17-jdk",
    "openjdk-21-jdk",
];

pub const DEFAULT_SNAP: &[&str] = &[
    "android-studio",
    "brave",
    "code",
    "gh",
    "go",
    "intellij-idea",
    "kubectl",
    "microk8s",
    "pycharm-community",
    "thunderbird",
    "tmux",
];

pub const DEFAULT_SNAP_CLASSIC: &[&str] = &[
    "code",
    "intellij-idea",
    "go",
    "android-studio",
    "microk8s",
    "thunderbird",
    "pycharm-community",
    "kubectl",
    "tmux",
];

pub const DEFAULT_SCRIPTS: &[&str] = &["docker", "nvim", "fzf", "eza", "nvm"];

/// The three selectable catalogs plus the snaps that need `--classic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    pub apt: Vec<String>,
    pub snap: Vec<String>,
    pub snap_classic: BTreeSet<String>,
    pub scripts: Vec<String>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            apt: owned(DEFAULT_APT),
            snap: owned(DEFAULT_SNAP),
            snap_classic: DEFAULT_SNAP_CLASSIC.iter().map(ToString::to_string).collect(),
            scripts: owned(DEFAULT_SCRIPTS),
        }
    }
}

impl Catalogs {
    pub fn is_classic(&self, snap: &str) -> bool {
        self.snap_classic.contains(snap)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    apt: Option<Vec<String>>,
    snap: Option<Vec<String>>,
    snap_classic: Option<Vec<String>>,
    scripts: Option<Vec<String>>,
}

/// Explicit path must exist; the default path is only read when present.
pub fn load(explicit: Option<&Path>) -> Result<Catalogs, InstallError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let Some(home) = home_dir() else {
        return Ok(Catalogs::default());
    };
    let path = config_path_for_home(&home);
    if path.exists() {
        load_from_path(&path)
    } else {
        Ok(Catalogs::default())
    }
}

pub fn load_from_path(path: &Path) -> Result<Catalogs, InstallError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| InstallError::config(path, format!("failed to read: {err}")))?;
    parse_catalogs(&raw).map_err(|message| InstallError::config(path, message))
}

pub fn config_path_for_home(home: &Path) -> PathBuf {
    home.join(".config").join("appkit").join("config.toml")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

fn parse_catalogs(raw: &str) -> Result<Catalogs, String> {
    let file: CatalogFile = toml::from_str(raw).map_err(|err| err.message().to_string())?;
    let mut catalogs = Catalogs::default();

    if let Some(apt) = file.apt {
        catalogs.apt = apt;
    }
    if let Some(snap) = file.snap {
        catalogs.snap = snap;
    }
    match file.snap_classic {
        Some(classic) => catalogs.snap_classic = classic.into_iter().collect(),
        // Default classic snaps only apply to the ones still in the catalog.
        None => {
            let snap = &catalogs.snap;
            catalogs.snap_classic.retain(|name| snap.contains(name));
        }
    }
    if let Some(scripts) = file.scripts {
        catalogs.scripts = scripts;
    }

    validate(&catalogs)?;
    Ok(catalogs)
}

fn validate(catalogs: &Catalogs) -> Result<(), String> {
    for (key, items) in [
        ("apt", &catalogs.apt),
        ("snap", &catalogs.snap),
        ("scripts", &catalogs.scripts),
    ] {
        let mut seen = HashSet::new();
        for item in items {
            if item.trim().is_empty() {
                return Err(format!("`{key}` contains an empty entry"));
            }
            if !seen.insert(item.as_str()) {
                return Err(format!("`{key}` lists `{item}` more than once"));
            }
        }
    }

    if let Some(stray) = catalogs
        .snap_classic
        .iter()
        .find(|name| !catalogs.snap.contains(name))
    {
        return Err(format!("`snap_classic` entry `{stray}` is not in `snap`"));
    }

    Ok(())
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mark_expected_snaps_classic() {
        let catalogs = Catalogs::default();
        assert!(catalogs.is_classic("code"));
        assert!(catalogs.is_classic("tmux"));
        assert!(!catalogs.is_classic("brave"));
        assert!(!catalogs.is_classic("gh"));
        assert_eq!(catalogs.scripts, vec!["docker", "nvim", "fzf", "eza", "nvm"]);
    }

    #[test]
    fn default_catalogs_validate() {
        validate(&Catalogs::default()).unwrap();
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let catalogs = parse_catalogs("apt = [\"git\", \"curl\"]\nscripts = [\"fzf\"]\n").unwrap();
        assert_eq!(catalogs.apt, vec!["git", "curl"]);
        assert_eq!(catalogs.scripts, vec!["fzf"]);
        assert_eq!(catalogs.snap, owned(DEFAULT_SNAP));
        assert!(catalogs.is_classic("code"));
    }

    #[test]
    fn snap_override_narrows_default_classic_set() {
        let catalogs = parse_catalogs("snap = [\"gh\", \"code\"]\n").unwrap();
        assert_eq!(catalogs.snap, vec!["gh", "code"]);
        assert!(catalogs.is_classic("code"));
        assert!(!catalogs.is_classic("gh"));
        assert_eq!(catalogs.snap_classic.len(), 1);
    }

    #[test]
    fn rejects_explicit_classic_snap_outside_catalog() {
        let err = parse_catalogs("snap = [\"gh\"]\nsnap_classic = [\"code\"]\n").unwrap_err();
        assert!(err.contains("is not in `snap`"), "{err}");
    }

    #[test]
    fn rejects_duplicates_and_unknown_keys() {
        let err = parse_catalogs("apt = [\"git\", \"git\"]\n").unwrap_err();
        assert!(err.contains("more than once"), "{err}");

        assert!(parse_catalogs("flatpak = [\"x\"]\n").is_err());
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "snap = [\"code\", \"gh\"]\nsnap_classic = [\"code\"]\n").unwrap();

        let catalogs = load(Some(&path)).unwrap();
        assert_eq!(catalogs.snap, vec!["code", "gh"]);
        assert!(catalogs.is_classic("code"));
        assert!(!catalogs.is_classic("gh"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, InstallError::Config { .. }));
    }

    #[test]
    fn config_path_lives_under_dot_config() {
        assert_eq!(
            config_path_for_home(Path::new("/home/u")),
            PathBuf::from("/home/u/.config/appkit/config.toml")
        );
    }
}
