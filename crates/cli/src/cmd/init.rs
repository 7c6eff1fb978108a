//! Initialize a results directory

use crate::config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;

pub fn run(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let created = config::init_if_missing(dir)
        .with_context(|| format!("Failed to write config in {}", dir.display()))?;

    let (_, store) = util::open_store(dir)?;
    util::persist(&store)?;

    if created {
        println!("{} Initialized results directory at {}", "✓".green(), dir.display());
    } else {
        println!("Results directory already initialized at {}", dir.display());
    }
    println!();
    println!("  - {}  (settings)", config::CONFIG_FILE.cyan());
    println!("  - {}  (result snapshot)", store.options().snapshot_file.cyan());
    println!();
    println!("Next steps:");
    println!("  - Run 'pr add container root <id> <name>' to start the tree");
    println!("  - Run 'pr tree' to see the results");
    Ok(())
}
