//! Configuration management command
//!
//! View and edit `prettyresults.toml` of a results directory.

use crate::config::{self, Config, IMAGE_WIDTH_RANGE};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// Keys accepted by `get` and `set`
const KEYS: [&str; 6] = [
    "store.snapshot_file",
    "store.figure_extension",
    "document.image_width_px",
    "document.title",
    "web.data_file",
    "web.global_name",
];

/// List all configuration values
pub fn run_list(dir: &Path) -> Result<()> {
    let config = config::load(dir)?;
    let path = config::config_file_path(dir);

    println!("{}", "Results Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), path.display().dimmed());

    let mut section = "";
    for key in KEYS {
        let (prefix, name) = key.split_once('.').unwrap_or(("", key));
        if prefix != section {
            if !section.is_empty() {
                println!();
            }
            println!("{}", format!("[{}]", prefix).yellow());
            section = prefix;
        }
        println!("  {} = {}", name.cyan(), value_of(&config, key)?);
    }

    if !config.containers.is_empty() {
        println!("\n{} ({})", "[[containers]]".yellow(), config.containers.len());
        for spec in &config.containers {
            println!("  {} {}", spec.id.cyan(), spec.name);
        }
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!(
        "  image_width_px: {}-{}",
        IMAGE_WIDTH_RANGE.start(),
        IMAGE_WIDTH_RANGE.end()
    );
    println!("  snapshot_file, data_file: plain file names");
    println!("  global_name: JavaScript identifier");
    Ok(())
}

/// Get a single configuration value
pub fn run_get(dir: &Path, key: &str) -> Result<()> {
    let config = config::load(dir)?;
    println!("{}", value_of(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub fn run_set(dir: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = config::load(dir)?;

    match key {
        "store.snapshot_file" => config.store.snapshot_file = value.to_string(),
        "store.figure_extension" => config.store.figure_extension = value.to_string(),
        "document.image_width_px" => {
            config.document.image_width_px = value
                .parse()
                .context("Invalid value: must be a positive integer")?;
        }
        "document.title" => {
            config.document.title = (!value.is_empty()).then(|| value.to_string());
        }
        "web.data_file" => config.web.data_file = value.to_string(),
        "web.global_name" => config.web.global_name = value.to_string(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'pr config list' to see available keys.",
            key
        ),
    }

    // Validate before saving
    config.validate().context("Invalid configuration value")?;
    config::save(dir, &config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path
pub fn run_path(dir: &Path) -> Result<()> {
    let path = config::config_file_path(dir);
    println!("{}", path.display());
    if !path.exists() {
        println!("{}", "File does not exist. Use 'pr init' to create it.".yellow());
    }
    Ok(())
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "store.snapshot_file" => config.store.snapshot_file.clone(),
        "store.figure_extension" => config.store.figure_extension.clone(),
        "document.image_width_px" => config.document.image_width_px.to_string(),
        "document.title" => config.document.title.clone().unwrap_or_default(),
        "web.data_file" => config.web.data_file.clone(),
        "web.global_name" => config.web.global_name.clone(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'pr config list' to see available keys.",
            key
        ),
    };
    Ok(value)
}
