//! Snapshot format: the persisted serialization of every node in a store
//!
//! ```json
//! {
//!   "results": [
//!     { "id": "root", "name": "Root result", "kind": "container",
//!       "data": {}, "labels": [], "children": ["root.region"] },
//!     { "id": "root.region.bar", "name": "Chart", "kind": "figure",
//!       "data": { "filename": "root.region.bar.jpg" }, "labels": [], "children": [] }
//!   ],
//!   "root_result": "root"
//! }
//! ```
//!
//! Readers must not rely on array order; nodes are reconstructed by `id`.

use pr_core::{Error, Figure, Label, NodeKind, Result, ResultId, ResultNode, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Top-level snapshot record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub results: Vec<NodeRecord>,
    pub root_result: String,
}

/// One persisted node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct FigureData {
    filename: String,
}

#[derive(Serialize, Deserialize)]
struct TableData {
    headings: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(default)]
    pre: String,
    #[serde(default)]
    post: String,
}

const KNOWN_KINDS: [&str; 3] = ["container", "figure", "table"];

impl NodeRecord {
    pub fn from_node(node: &ResultNode) -> Result<Self> {
        let data = match &node.kind {
            NodeKind::Container => Value::Object(Default::default()),
            NodeKind::Figure(figure) => serde_json::to_value(FigureData {
                filename: figure.filename.clone(),
            })?,
            NodeKind::Table(table) => serde_json::to_value(TableData {
                headings: table.headings.clone(),
                rows: table.rows.clone(),
                pre: table.pre.clone(),
                post: table.post.clone(),
            })?,
        };

        Ok(Self {
            id: node.id().to_string(),
            name: node.name.clone(),
            kind: node.kind_name().to_string(),
            data,
            labels: node.labels.clone(),
            children: node.children.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Rebuild the node; the kind must already be known to be valid
    fn into_node(self) -> Result<ResultNode> {
        let id = ResultId::parse(&self.id)
            .map_err(|e| Error::CorruptSnapshot(format!("bad id '{}': {}", self.id, e)))?;

        let kind = match self.kind.as_str() {
            "container" => NodeKind::Container,
            "figure" => {
                let data: FigureData = decode_data(&self.id, self.data)?;
                NodeKind::Figure(Figure::stored(data.filename))
            }
            "table" => {
                let data: TableData = decode_data(&self.id, self.data)?;
                let table = Table::new(data.headings, data.rows)
                    .map_err(|e| Error::CorruptSnapshot(format!("table {}: {}", self.id, e)))?
                    .with_pre(data.pre)
                    .with_post(data.post);
                NodeKind::Table(table)
            }
            other => {
                return Err(Error::UnknownResultType {
                    id: self.id,
                    kind: other.to_string(),
                })
            }
        };

        let children = self
            .children
            .iter()
            .map(|child| {
                ResultId::parse(child).map_err(|e| {
                    Error::CorruptSnapshot(format!("bad child '{}' of {}: {}", child, self.id, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResultNode::new(id, self.name, kind)
            .with_labels(self.labels)
            .with_children(children))
    }
}

fn decode_data<T: for<'de> Deserialize<'de>>(id: &str, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| Error::CorruptSnapshot(format!("bad data for {}: {}", id, e)))
}

/// Build the snapshot record for a set of nodes
pub fn to_snapshot<'a>(nodes: impl IntoIterator<Item = &'a ResultNode>) -> Result<SnapshotFile> {
    let results = nodes
        .into_iter()
        .map(NodeRecord::from_node)
        .collect::<Result<Vec<_>>>()?;
    Ok(SnapshotFile {
        results,
        root_result: ResultId::root().to_string(),
    })
}

/// Serialize nodes to snapshot bytes
pub fn encode<'a>(nodes: impl IntoIterator<Item = &'a ResultNode>) -> Result<Vec<u8>> {
    let snapshot = to_snapshot(nodes)?;
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

/// Decode snapshot bytes into nodes
///
/// Returns `CorruptSnapshot` for anything malformed, except an unrecognized
/// `kind`, which is `UnknownResultType` even if other records are also bad.
pub fn decode(bytes: &[u8]) -> Result<Vec<ResultNode>> {
    let snapshot: SnapshotFile =
        serde_json::from_slice(bytes).map_err(|e| Error::CorruptSnapshot(e.to_string()))?;

    if let Some(record) = snapshot
        .results
        .iter()
        .find(|r| !KNOWN_KINDS.contains(&r.kind.as_str()))
    {
        return Err(Error::UnknownResultType {
            id: record.id.clone(),
            kind: record.kind.clone(),
        });
    }

    snapshot.results.into_iter().map(NodeRecord::into_node).collect()
}

/// Atomic write helper
///
/// Writes data to a temporary file in the target's directory, fsyncs it,
/// then renames it over the target path.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
