//! Print the result tree

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use pr_core::{ResultId, ROOT};
use pr_store::ResultStore;
use std::collections::HashSet;
use std::path::Path;

pub fn run(dir: &Path) -> Result<()> {
    let (_, store) = util::open_store(dir)?;
    let root = ResultId::root();
    let mut seen = HashSet::new();
    print_node(&store, &root, 0, &mut seen)?;
    println!("\n{} {} results", "Total:".dimmed(), store.len());
    Ok(())
}

fn print_node(store: &ResultStore, id: &ResultId, depth: usize, seen: &mut HashSet<ResultId>) -> Result<()> {
    let indent = "  ".repeat(depth);
    if !seen.insert(id.clone()) {
        println!("{}{} {}", indent, id.as_str().cyan(), "(shown above)".dimmed());
        return Ok(());
    }
    let node = store.lookup(id.as_str())?;
    if id.as_str() == ROOT {
        println!("{}", node.name.bold());
    } else {
        println!("{}{}", indent, util::display_node_line(node));
    }
    for child in &node.children {
        print_node(store, child, depth + 1, seen)?;
    }
    Ok(())
}
