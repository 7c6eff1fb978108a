//! On-disk result store: identity index, reload, merge-on-add and persistence

use crate::builder::Container;
use crate::snapshot::{self, atomic_write};
use crate::surface::PlotSurface;
use indexmap::IndexMap;
use pr_core::{Error, NodeKind, PendingArtifact, Result, ResultId, ResultNode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Display name of the root container
pub const ROOT_NAME: &str = "Root result";

/// Container to (re-)declare under the root on every open
///
/// `id` is an unqualified segment; `children` nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ContainerSpec>,
}

impl ContainerSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ContainerSpec>) -> Self {
        self.children = children;
        self
    }
}

/// File naming inside the results directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Snapshot file name (default: `data.json`)
    pub snapshot_file: String,
    /// Extension for figure artifacts (default: `jpg`)
    pub figure_extension: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            snapshot_file: "data.json".to_string(),
            figure_extension: "jpg".to_string(),
        }
    }
}

/// Owns every result node of one results directory
///
/// Directory layout:
/// ```text
/// results/
///   data.json              snapshot of every node
///   root.region.bar.jpg    figure artifacts, named after their result ID
/// ```
///
/// Single writer: nothing here locks. Callers must not point two stores at
/// the same directory concurrently.
pub struct ResultStore {
    /// Results directory
    directory: PathBuf,
    options: StoreOptions,
    /// ID -> node, in insertion order
    results: IndexMap<ResultId, ResultNode>,
    /// Renders figures added with `PendingArtifact::CurrentSurface`
    surface: Option<Box<dyn PlotSurface>>,
}

impl ResultStore {
    /// Open a results directory with default file naming
    pub fn open(directory: &Path, containers: &[ContainerSpec]) -> Result<Self> {
        Self::open_with(directory, containers, StoreOptions::default())
    }

    /// Open a results directory, reloading any previous snapshot
    ///
    /// A missing or malformed snapshot starts an empty store. A snapshot
    /// naming an unknown result kind is an error. The root container and
    /// `containers` are then (re-)declared; re-declared containers keep the
    /// children they had in the snapshot.
    pub fn open_with(
        directory: &Path,
        containers: &[ContainerSpec],
        options: StoreOptions,
    ) -> Result<Self> {
        fs::create_dir_all(directory)?;

        let mut store = Self {
            directory: directory.to_path_buf(),
            options,
            results: IndexMap::new(),
            surface: None,
        };
        store.results = store.load_snapshot()?;

        store.add(ResultNode::container(ResultId::root(), ROOT_NAME))?;
        store.create_containers(&ResultId::root(), containers)?;
        Ok(store)
    }

    fn load_snapshot(&self) -> Result<IndexMap<ResultId, ResultNode>> {
        let path = self.snapshot_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
                return Ok(IndexMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        match snapshot::decode(&bytes) {
            Ok(nodes) => {
                info!("Loaded {} results from {}", nodes.len(), path.display());
                Ok(nodes
                    .into_iter()
                    .map(|node| (node.id().clone(), node))
                    .collect())
            }
            Err(Error::CorruptSnapshot(reason)) => {
                warn!("Ignoring corrupt snapshot {}: {}", path.display(), reason);
                Ok(IndexMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn create_containers(&mut self, parent: &ResultId, specs: &[ContainerSpec]) -> Result<()> {
        for spec in specs {
            let child = Container::new(self, parent.clone())
                .add_container(&spec.id, &spec.name)?
                .id()
                .clone();
            self.create_containers(&child, &spec.children)?;
        }
        Ok(())
    }

    /// Attach the surface used to render `CurrentSurface` figures
    pub fn set_plot_surface(&mut self, surface: impl PlotSurface + 'static) {
        self.surface = Some(Box::new(surface));
    }

    /// Register a node, replacing any node with the same ID
    ///
    /// A replaced node hands its children over to the new one. A figure with
    /// a pending image has it written to the results directory and cleared,
    /// so adding the same figure again does not rewrite the file.
    pub fn add(&mut self, mut node: ResultNode) -> Result<&mut ResultNode> {
        if let Some(old) = self.results.get(node.id()) {
            debug!("Merging {} ({} children kept)", node.id(), old.children.len());
            node.merge(old);
        }

        self.write_artifact(&mut node)?;

        let (index, _) = self.results.insert_full(node.id().clone(), node);
        Ok(&mut self.results[index])
    }

    fn write_artifact(&mut self, node: &mut ResultNode) -> Result<()> {
        let id = node.id().clone();
        let NodeKind::Figure(figure) = &mut node.kind else {
            return Ok(());
        };
        let Some(pending) = figure.pending.take() else {
            return Ok(());
        };

        let bytes = match pending {
            PendingArtifact::Image(bytes) => bytes,
            PendingArtifact::CurrentSurface => match self.surface.as_mut() {
                Some(surface) => surface.capture()?,
                None => return Err(Error::NoPlotSurface(id)),
            },
        };

        let path = self.directory.join(&figure.filename);
        atomic_write(&path, &bytes)?;
        debug!("Wrote artifact {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Exact-match lookup
    pub fn lookup(&self, id: &str) -> Result<&ResultNode> {
        self.results.get(id).ok_or_else(|| not_found(id))
    }

    pub fn lookup_mut(&mut self, id: &str) -> Result<&mut ResultNode> {
        self.results.get_mut(id).ok_or_else(|| not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.results.contains_key(id)
    }

    /// Builder handle for an existing container
    pub fn container(&mut self, id: &str) -> Result<Container<'_>> {
        let node = self.lookup(id)?;
        node.expect_container()?;
        let id = node.id().clone();
        Ok(Container::new(self, id))
    }

    /// Builder handle for the root container
    pub fn root(&mut self) -> Container<'_> {
        Container::new(self, ResultId::root())
    }

    /// Every node, in insertion order
    pub fn results(&self) -> impl Iterator<Item = &ResultNode> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Write every node to the snapshot file, replacing it atomically
    pub fn persist(&self) -> Result<()> {
        let bytes = snapshot::encode(self.results.values())?;
        let path = self.snapshot_path();
        atomic_write(&path, &bytes)?;
        info!("Persisted {} results to {}", self.results.len(), path.display());
        Ok(())
    }

    /// Results directory (also the artifact directory)
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.directory.join(&self.options.snapshot_file)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Where a figure's artifact lives on disk
    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(id.to_string())
}
