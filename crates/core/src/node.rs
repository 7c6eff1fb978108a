//! Result nodes: the entities of the result tree
//!
//! A node carries identity and presentation metadata shared by every kind,
//! plus a kind-specific payload held in [`NodeKind`]. Payload fields are
//! reached through typed accessors (`as_table`, `as_figure`, ...) which fail
//! with [`Error::WrongKind`] when the node is of another kind.

use crate::error::{Error, Result};
use crate::id::ResultId;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Annotation tag attached to a result (e.g. "significant")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub color: String,
    pub text: String,
}

impl Label {
    pub fn new(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
        }
    }

    /// Tag used by statistical tests that reject the null hypothesis
    pub fn significant() -> Self {
        Self::new("green", "significant")
    }
}

/// Image handed to a figure before it has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingArtifact {
    /// Encoded image bytes, written verbatim
    Image(Vec<u8>),
    /// Capture whatever plotting surface is active when the figure is added
    CurrentSurface,
}

/// Figure payload: a rendered image stored next to the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    /// File name relative to the results directory
    pub filename: String,
    /// Present only for figures created in this run and not yet written
    pub pending: Option<PendingArtifact>,
}

impl Figure {
    /// Figure whose artifact has already been written (e.g. loaded from disk)
    pub fn stored(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            pending: None,
        }
    }

    /// Figure with an image still to be written under `filename`
    pub fn pending(filename: impl Into<String>, artifact: PendingArtifact) -> Self {
        Self {
            filename: filename.into(),
            pending: Some(artifact),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Figure(Figure),
    Table(Table),
}

impl NodeKind {
    /// Discriminator as written to the snapshot
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Figure(_) => "figure",
            NodeKind::Table(_) => "table",
        }
    }
}

/// One entity of the result tree
#[derive(Debug, Clone, PartialEq)]
pub struct ResultNode {
    id: ResultId,
    /// Human-readable display name
    pub name: String,
    pub labels: Vec<Label>,
    /// Child IDs, in insertion order
    pub children: Vec<ResultId>,
    pub kind: NodeKind,
}

impl ResultNode {
    pub fn new(id: ResultId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            labels: Vec::new(),
            children: Vec::new(),
            kind,
        }
    }

    pub fn container(id: ResultId, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Container)
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_children(mut self, children: Vec<ResultId>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> &ResultId {
        &self.id
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container)
    }

    /// Take over the children of the node this one replaces
    pub fn merge(&mut self, old: &ResultNode) {
        self.children = old.children.clone();
    }

    pub fn as_figure(&self) -> Result<&Figure> {
        match &self.kind {
            NodeKind::Figure(figure) => Ok(figure),
            _ => Err(self.wrong_kind("figure")),
        }
    }

    pub fn as_figure_mut(&mut self) -> Result<&mut Figure> {
        let actual = self.kind.name();
        match &mut self.kind {
            NodeKind::Figure(figure) => Ok(figure),
            _ => Err(Error::WrongKind {
                id: self.id.clone(),
                expected: "figure",
                actual,
            }),
        }
    }

    pub fn as_table(&self) -> Result<&Table> {
        match &self.kind {
            NodeKind::Table(table) => Ok(table),
            _ => Err(self.wrong_kind("table")),
        }
    }

    pub fn as_table_mut(&mut self) -> Result<&mut Table> {
        let actual = self.kind.name();
        match &mut self.kind {
            NodeKind::Table(table) => Ok(table),
            _ => Err(Error::WrongKind {
                id: self.id.clone(),
                expected: "table",
                actual,
            }),
        }
    }

    /// Fail unless this node is a container
    pub fn expect_container(&self) -> Result<()> {
        if self.is_container() {
            Ok(())
        } else {
            Err(self.wrong_kind("container"))
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> Error {
        Error::WrongKind {
            id: self.id.clone(),
            expected,
            actual: self.kind.name(),
        }
    }
}
