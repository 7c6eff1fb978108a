//! Show a single result

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use pr_core::NodeKind;
use std::path::Path;

/// Maximum table rows printed before eliding
const MAX_ROWS: usize = 20;

pub fn run(dir: &Path, id: &str) -> Result<()> {
    let (_, store) = util::open_store(dir)?;
    let node = store.lookup(id)?;

    println!("{} {}", node.kind_name().yellow().bold(), node.id().as_str().cyan());
    println!("{} {}", "Name:    ".dimmed(), node.name);
    if !node.labels.is_empty() {
        let labels: Vec<_> = node
            .labels
            .iter()
            .map(|l| format!("{} ({})", l.text, l.color))
            .collect();
        println!("{} {}", "Labels:  ".dimmed(), labels.join(", "));
    }

    match &node.kind {
        NodeKind::Container => {}
        NodeKind::Figure(figure) => {
            let path = store.artifact_path(&figure.filename);
            let status = if path.is_file() {
                "".to_string()
            } else {
                format!(" {}", "(missing)".red())
            };
            println!("{} {}{}", "File:    ".dimmed(), path.display(), status);
        }
        NodeKind::Table(table) => {
            if !table.pre.is_empty() {
                println!("\n{}", table.pre);
            }
            println!("\n{}", table.headings.join(" | ").bold());
            for row in table.rows.iter().take(MAX_ROWS) {
                println!("{}", row.join(" | "));
            }
            if table.rows.len() > MAX_ROWS {
                println!("{} ({} more rows omitted)", "...".dimmed(), table.rows.len() - MAX_ROWS);
            }
            if !table.post.is_empty() {
                println!("\n{}", table.post);
            }
        }
    }

    if !node.children.is_empty() {
        println!("\n{} ({})", "Children:".bold(), node.children.len());
        for child in &node.children {
            match store.lookup(child.as_str()) {
                Ok(child) => println!("  {}", util::display_node_line(child)),
                Err(_) => println!("  {} {}", child.as_str().cyan(), "(dangling)".red()),
            }
        }
    }
    Ok(())
}
