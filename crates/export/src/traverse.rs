//! Depth-first traversal shared by every exporter
//!
//! Requested roots are visited in caller order, each subtree pre-order.
//! A node is visited at most once per call: a root already reached through
//! an earlier root, or a child linked from two containers, is skipped.

use pr_core::{Error, Figure, NodeKind, Result, ResultId, ResultNode, Table};
use pr_store::ResultStore;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Format-specific actions taken while walking the tree
pub trait Visitor {
    /// Called for every visited node before its payload or children
    fn heading(&mut self, node: &ResultNode, depth: usize) -> Result<()>;

    /// Called for a figure whose artifact exists at `artifact`
    fn figure(&mut self, node: &ResultNode, figure: &Figure, artifact: &Path) -> Result<()>;

    fn table(&mut self, node: &ResultNode, table: &Table) -> Result<()>;
}

/// Roots to export: the requested IDs, or every direct child of the root
pub fn resolve_roots(store: &ResultStore, requested: Option<&[ResultId]>) -> Result<Vec<ResultId>> {
    match requested {
        Some(ids) => Ok(ids.to_vec()),
        None => Ok(store.lookup(pr_core::ROOT)?.children.clone()),
    }
}

/// Walk `roots` and return the IDs in visit order
pub fn walk<V: Visitor>(store: &ResultStore, roots: &[ResultId], visitor: &mut V) -> Result<Vec<ResultId>> {
    let mut walk = Walk {
        store,
        visited: HashSet::new(),
        order: Vec::new(),
    };
    for root in roots {
        walk.visit(root, 0, visitor)?;
    }
    Ok(walk.order)
}

struct Walk<'s> {
    store: &'s ResultStore,
    visited: HashSet<ResultId>,
    order: Vec<ResultId>,
}

impl<'s> Walk<'s> {
    fn visit<V: Visitor>(&mut self, id: &ResultId, depth: usize, visitor: &mut V) -> Result<()> {
        if !self.visited.insert(id.clone()) {
            debug!("Skipping {}: already visited", id);
            return Ok(());
        }
        let store = self.store;
        let node = store.lookup(id.as_str())?;
        self.order.push(id.clone());
        visitor.heading(node, depth)?;

        match &node.kind {
            NodeKind::Container => {
                for child in &node.children {
                    self.visit(child, depth + 1, visitor)?;
                }
            }
            NodeKind::Figure(figure) => {
                let artifact = store.artifact_path(&figure.filename);
                if !artifact.is_file() {
                    return Err(Error::MissingArtifact {
                        id: id.clone(),
                        path: artifact,
                    });
                }
                visitor.figure(node, figure, &artifact)?;
            }
            NodeKind::Table(table) => visitor.table(node, table)?,
        }
        Ok(())
    }
}
