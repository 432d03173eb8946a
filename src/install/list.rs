use std::io::{self, Write};

use super::scripts::Registry;
use crate::config::Catalogs;

pub fn run(out: &mut dyn Write, catalogs: &Catalogs, registry: &Registry) -> io::Result<()> {
    writeln!(out, "APT packages:")?;
    for package in &catalogs.apt {
        writeln!(out, "- {package}")?;
    }

    writeln!(out, "SNAP packages:")?;
    for package in &catalogs.snap {
        if catalogs.is_classic(package) {
            writeln!(out, "- {package} [classic]")?;
        } else {
            writeln!(out, "- {package}")?;
        }
    }

    writeln!(out, "Shell scripts:")?;
    for id in &catalogs.scripts {
        match registry.get(id) {
            Some(installer) => writeln!(out, "- {id}: {}", installer.label())?,
            None => writeln!(out, "- {id} [no installer]")?,
        }
    }

    let extra = registry
        .ids()
        .filter(|id| !catalogs.scripts.iter().any(|listed| listed == id))
        .collect::<Vec<_>>();
    if !extra.is_empty() {
        writeln!(out, "Also available via config: {}", extra.join(", "))?;
    }

    Ok(())
}
