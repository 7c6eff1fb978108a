//! Shared utilities for CLI commands

use crate::config::{self, Config};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pr_core::{Label, ResultId, ResultNode};
use pr_store::ResultStore;
use std::path::Path;
use tracing::debug;

/// Load the config and open the store of `dir`, re-declaring its containers
pub fn open_store(dir: &Path) -> Result<(Config, ResultStore)> {
    let config = config::load(dir)
        .with_context(|| format!("Failed to load config in {}", dir.display()))?;
    let store = ResultStore::open_with(dir, &config.containers, config.store_options())
        .with_context(|| format!("Failed to open results in {}", dir.display()))?;
    debug!("Opened {} with {} results", dir.display(), store.len());
    Ok((config, store))
}

/// Persist the store, with context
pub fn persist(store: &ResultStore) -> Result<()> {
    store
        .persist()
        .with_context(|| format!("Failed to write {}", store.snapshot_path().display()))
}

/// Parse a list of fully qualified IDs given on the command line
pub fn parse_ids(ids: &[String]) -> Result<Option<Vec<ResultId>>> {
    if ids.is_empty() {
        return Ok(None);
    }
    let parsed = ids
        .iter()
        .map(|id| ResultId::parse(id).with_context(|| format!("Invalid result ID '{}'", id)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(parsed))
}

/// Parse a `color:text` label argument
pub fn parse_label(arg: &str) -> Result<Label> {
    match arg.split_once(':') {
        Some((color, text)) if !color.is_empty() && !text.is_empty() => Ok(Label::new(color, text)),
        _ => anyhow::bail!("Invalid label '{}': expected COLOR:TEXT", arg),
    }
}

/// Parse a `key=value` pair argument
pub fn parse_pair(arg: &str) -> Result<(String, String)> {
    arg.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .with_context(|| format!("Invalid pair '{}': expected KEY=VALUE", arg))
}

/// One-line summary: `name  id  [kind]  labels`
pub fn display_node_line(node: &ResultNode) -> String {
    let mut line = format!(
        "{}  {}  {}",
        node.name.bold(),
        node.id().as_str().cyan(),
        format!("[{}]", node.kind_name()).dimmed()
    );
    for label in &node.labels {
        line.push_str(&format!("  {}", format!("({})", label.text).green()));
    }
    line
}
