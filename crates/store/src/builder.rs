//! Tree builder API
//!
//! A [`Container`] is a handle on one container node of a [`ResultStore`].
//! Its `add_*` methods mint the child's fully-qualified ID, register the
//! child with the store (merging with any node already under that ID) and
//! link it into the container's `children` exactly once.

use crate::store::ResultStore;
use pr_core::{
    Figure, Frame, Label, NodeKind, PendingArtifact, Result, ResultId, ResultNode, Table,
};
use std::fmt::Display;

/// Builder handle on a container node
pub struct Container<'a> {
    store: &'a mut ResultStore,
    id: ResultId,
}

impl<'a> Container<'a> {
    /// Caller guarantees `id` names a container in `store`
    pub(crate) fn new(store: &'a mut ResultStore, id: ResultId) -> Self {
        Self { store, id }
    }

    pub fn id(&self) -> &ResultId {
        &self.id
    }

    pub fn node(&self) -> Result<&ResultNode> {
        self.store.lookup(self.id.as_str())
    }

    /// Child registered under `segment`
    pub fn get_child(&self, segment: &str) -> Result<&ResultNode> {
        let id = self.id.child(segment)?;
        self.store.lookup(id.as_str())
    }

    /// Add a child container and return a handle on it
    pub fn add_container(&mut self, segment: &str, name: &str) -> Result<Container<'_>> {
        let id = self.add_child(segment, name, Vec::new(), NodeKind::Container)?
            .id()
            .clone();
        Ok(Container::new(&mut *self.store, id))
    }

    /// Add a figure; the image is written when the figure is registered
    ///
    /// The artifact is named `<child id>.<figure extension>`.
    pub fn add_figure(
        &mut self,
        segment: &str,
        name: &str,
        image: PendingArtifact,
    ) -> Result<&mut ResultNode> {
        let id = self.id.child(segment)?;
        let filename = format!("{}.{}", id, self.store.options().figure_extension);
        let node = ResultNode::new(id, name, NodeKind::Figure(Figure::pending(filename, image)));
        self.register(node)
    }

    /// Add a figure captured from the store's plotting surface
    pub fn add_current_figure(&mut self, segment: &str, name: &str) -> Result<&mut ResultNode> {
        self.add_figure(segment, name, PendingArtifact::CurrentSurface)
    }

    /// Add a table from headings and a rectangular grid of rows
    pub fn add_table(
        &mut self,
        segment: &str,
        name: &str,
        headings: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<&mut ResultNode> {
        let table = Table::new(headings, rows)?;
        self.add_table_with(segment, name, table)
    }

    /// Add an already built table (e.g. one carrying `pre`/`post` text)
    pub fn add_table_with(&mut self, segment: &str, name: &str, table: Table) -> Result<&mut ResultNode> {
        self.add_child(segment, name, Vec::new(), NodeKind::Table(table))
    }

    /// Add a two-column table from an index/value series
    pub fn add_series_table<K, V, I>(
        &mut self,
        segment: &str,
        name: &str,
        index_name: &str,
        series_name: &str,
        series: I,
    ) -> Result<&mut ResultNode>
    where
        K: Display,
        V: Display,
        I: IntoIterator<Item = (K, V)>,
    {
        let table = Table::from_series(index_name, series_name, series)?;
        self.add_table_with(segment, name, table)
    }

    /// Add a table from a labelled 2-D grid
    pub fn add_frame_table<V: Display>(
        &mut self,
        segment: &str,
        name: &str,
        frame: &Frame<V>,
    ) -> Result<&mut ResultNode> {
        let table = Table::from_frame(frame)?;
        self.add_table_with(segment, name, table)
    }

    /// Add a `Nombre`/`Valor` table
    pub fn add_keyvalue_table<K, V, I>(
        &mut self,
        segment: &str,
        name: &str,
        pairs: I,
    ) -> Result<&mut ResultNode>
    where
        K: Display,
        V: Display,
        I: IntoIterator<Item = (K, V)>,
    {
        let table = Table::key_value(pairs)?;
        self.add_table_with(segment, name, table)
    }

    /// Add a child of any kind with labels
    pub fn add_child(
        &mut self,
        segment: &str,
        name: &str,
        labels: Vec<Label>,
        kind: NodeKind,
    ) -> Result<&mut ResultNode> {
        let id = self.id.child(segment)?;
        self.register(ResultNode::new(id, name, kind).with_labels(labels))
    }

    fn register(&mut self, node: ResultNode) -> Result<&mut ResultNode> {
        let id = node.id().clone();
        self.store.add(node)?;

        let parent = self.store.lookup_mut(self.id.as_str())?;
        if !parent.children.contains(&id) {
            parent.children.push(id.clone());
        }
        self.store.lookup_mut(id.as_str())
    }
}
