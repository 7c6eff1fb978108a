//! Add results under an existing container

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pr_core::{Label, NodeKind, PendingArtifact, ResultNode, Table};
use std::fs;
use std::path::Path;

/// Where a new result goes and how it is labelled
pub struct Placement<'a> {
    pub parent: &'a str,
    pub segment: &'a str,
    pub name: &'a str,
    pub labels: &'a [String],
}

impl Placement<'_> {
    fn labels(&self) -> Result<Vec<Label>> {
        self.labels.iter().map(|l| util::parse_label(l)).collect()
    }
}

pub fn container(dir: &Path, at: &Placement<'_>) -> Result<()> {
    let labels = at.labels()?;
    add(dir, at, |parent| {
        parent.add_child(at.segment, at.name, labels, NodeKind::Container)
    })
}

pub fn table(
    dir: &Path,
    at: &Placement<'_>,
    headings: Vec<String>,
    pre: Option<String>,
    post: Option<String>,
) -> Result<()> {
    let mut table = Table::new(headings, Vec::new())?;
    if let Some(pre) = pre {
        table = table.with_pre(pre);
    }
    if let Some(post) = post {
        table = table.with_post(post);
    }
    let labels = at.labels()?;
    add(dir, at, |parent| {
        parent.add_child(at.segment, at.name, labels, NodeKind::Table(table))
    })
}

pub fn keyvalue(dir: &Path, at: &Placement<'_>, pairs: &[String]) -> Result<()> {
    let pairs = pairs
        .iter()
        .map(|p| util::parse_pair(p))
        .collect::<Result<Vec<_>>>()?;
    let table = Table::key_value(pairs)?;
    let labels = at.labels()?;
    add(dir, at, |parent| {
        parent.add_child(at.segment, at.name, labels, NodeKind::Table(table))
    })
}

pub fn figure(dir: &Path, at: &Placement<'_>, image: &Path) -> Result<()> {
    let bytes = fs::read(image)
        .with_context(|| format!("Failed to read image {}", image.display()))?;
    let labels = at.labels()?;
    add(dir, at, |parent| {
        let node = parent.add_figure(at.segment, at.name, PendingArtifact::Image(bytes))?;
        node.labels = labels;
        Ok(node)
    })
}

fn add<F>(dir: &Path, at: &Placement<'_>, build: F) -> Result<()>
where
    F: for<'s> FnOnce(&'s mut pr_store::Container<'_>) -> pr_core::Result<&'s mut ResultNode>,
{
    let (_, mut store) = util::open_store(dir)?;
    let line = {
        let mut parent = store
            .container(at.parent)
            .with_context(|| format!("Cannot add under '{}'", at.parent))?;
        let node = build(&mut parent)
            .with_context(|| format!("Failed to add '{}' under '{}'", at.segment, at.parent))?;
        util::display_node_line(node)
    };
    util::persist(&store)?;
    println!("{} Added {}", "✓".green(), line);
    Ok(())
}
