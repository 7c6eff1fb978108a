//! Structured-data (web) export
//!
//! Produces a stand-alone directory that can be copied anywhere:
//! ```text
//! web/
//!   index.html  app.js  style.css    bundled viewer
//!   result_data.js                   var ANALYSIS_RESULTS = { ... };
//!   results/                         copies of the visited figures
//! ```
//! The data file embeds every node of the store, not only the requested
//! subtrees, so the viewer can resolve any ID.

use crate::traverse::{resolve_roots, walk, Visitor};
use pr_core::{Error, Figure, Result, ResultId, ResultNode, Table};
use pr_store::snapshot::{to_snapshot, SnapshotFile};
use pr_store::ResultStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const INDEX_HTML: &str = include_str!("../assets/index.html");
const APP_JS: &str = include_str!("../assets/app.js");
const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Subdirectory holding the copied figure artifacts
pub const RESULTS_SUBDIR: &str = "results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebOptions {
    /// Data file name (default: `result_data.js`)
    pub data_file: String,
    /// Global the data is assigned to (default: `ANALYSIS_RESULTS`)
    pub global_name: String,
    /// Remove an existing destination instead of failing
    pub overwrite: bool,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            data_file: "result_data.js".to_string(),
            global_name: "ANALYSIS_RESULTS".to_string(),
            overwrite: false,
        }
    }
}

/// Summary of a finished web export
#[derive(Debug, Clone)]
pub struct WebExport {
    pub directory: PathBuf,
    /// Nodes reached from the requested roots, in visit order
    pub visited: Vec<ResultId>,
    /// Figure artifacts copied into `results/`
    pub artifacts: usize,
}

#[derive(Serialize)]
struct WebData<'a> {
    #[serde(flatten)]
    snapshot: SnapshotFile,
    requested_roots: &'a [ResultId],
}

/// Collects the artifacts of visited figures
#[derive(Default)]
struct ArtifactCollector {
    artifacts: Vec<(PathBuf, String)>,
}

impl Visitor for ArtifactCollector {
    fn heading(&mut self, _node: &ResultNode, _depth: usize) -> Result<()> {
        Ok(())
    }

    fn figure(&mut self, _node: &ResultNode, figure: &Figure, artifact: &Path) -> Result<()> {
        self.artifacts
            .push((artifact.to_path_buf(), figure.filename.clone()));
        Ok(())
    }

    fn table(&mut self, _node: &ResultNode, _table: &Table) -> Result<()> {
        Ok(())
    }
}

pub struct WebExporter {
    options: WebOptions,
}

impl WebExporter {
    pub fn new(options: WebOptions) -> Self {
        Self { options }
    }

    /// Export `requested` (or every child of the root) into `destination`
    ///
    /// The tree is walked before anything is written, so a missing artifact
    /// leaves an existing destination untouched. A destination that is, or
    /// contains, the store directory is never replaced.
    pub fn export(
        &self,
        store: &ResultStore,
        destination: &Path,
        requested: Option<&[ResultId]>,
    ) -> Result<WebExport> {
        if destination.exists() {
            if !self.options.overwrite {
                return Err(Error::AlreadyExists(destination.to_path_buf()));
            }
            check_replaceable(store, destination)?;
        }

        let roots = resolve_roots(store, requested)?;
        let mut collector = ArtifactCollector::default();
        let visited = walk(store, &roots, &mut collector)?;

        if destination.exists() {
            fs::remove_dir_all(destination)?;
        }
        let results_dir = destination.join(RESULTS_SUBDIR);
        fs::create_dir_all(&results_dir)?;

        self.write_assets(destination)?;

        let data = WebData {
            snapshot: to_snapshot(store.results())?,
            requested_roots: &roots,
        };
        let script = format!(
            "var {} = {};\n",
            self.options.global_name,
            serde_json::to_string_pretty(&data)?
        );
        fs::write(destination.join(&self.options.data_file), script)?;

        for (source, filename) in &collector.artifacts {
            fs::copy(source, results_dir.join(filename))?;
        }

        info!(
            "Exported {} results ({} figures) to {}",
            visited.len(),
            collector.artifacts.len(),
            destination.display()
        );
        Ok(WebExport {
            directory: destination.to_path_buf(),
            visited,
            artifacts: collector.artifacts.len(),
        })
    }

    fn write_assets(&self, destination: &Path) -> Result<()> {
        let index = INDEX_HTML.replace("{{DATA_FILE}}", &self.options.data_file);
        let app = APP_JS.replace("{{GLOBAL_NAME}}", &self.options.global_name);
        fs::write(destination.join("index.html"), index)?;
        fs::write(destination.join("app.js"), app)?;
        fs::write(destination.join("style.css"), STYLE_CSS)?;
        Ok(())
    }
}

/// Refuse to replace a destination that is, or contains, the store directory
fn check_replaceable(store: &ResultStore, destination: &Path) -> Result<()> {
    let destination = destination.canonicalize()?;
    let results = store.directory().canonicalize()?;
    if results.starts_with(&destination) {
        return Err(Error::UnsafeDestination {
            destination,
            results,
        });
    }
    Ok(())
}

impl Default for WebExporter {
    fn default() -> Self {
        Self::new(WebOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_core::PendingArtifact;
    use pr_store::ContainerSpec;
    use serde_json::Value;

    fn store_with_results(dir: &Path) -> anyhow::Result<ResultStore> {
        let specs = vec![
            ContainerSpec::new("region", "Region"),
            ContainerSpec::new("channel", "Channel"),
        ];
        let mut store = ResultStore::open(dir, &specs)?;
        store
            .container("root.region")?
            .add_figure("bar", "Chart", PendingArtifact::Image(b"jpeg".to_vec()))?;
        store
            .container("root.channel")?
            .add_keyvalue_table("freqs", "Freqs", [("Online", 3)])?;
        Ok(store)
    }

    fn read_data(path: &Path) -> anyhow::Result<Value> {
        let text = fs::read_to_string(path)?;
        let json = text
            .strip_prefix("var ANALYSIS_RESULTS = ")
            .and_then(|rest| rest.trim_end().strip_suffix(';'))
            .ok_or_else(|| anyhow::anyhow!("unexpected data file: {}", text))?;
        Ok(serde_json::from_str(json)?)
    }

    #[test]
    fn test_export_writes_site() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        let web = out.path().join("web");

        let export = WebExporter::default().export(&store, &web, None)?;

        assert_eq!(export.artifacts, 1);
        assert!(web.join("index.html").is_file());
        assert!(web.join("app.js").is_file());
        assert!(web.join("style.css").is_file());
        assert_eq!(fs::read(web.join("results/root.region.bar.jpg"))?, b"jpeg");

        let index = fs::read_to_string(web.join("index.html"))?;
        assert!(index.contains("src=\"result_data.js\""));
        let app = fs::read_to_string(web.join("app.js"))?;
        assert!(app.contains("var data = ANALYSIS_RESULTS;"));

        let data = read_data(&web.join("result_data.js"))?;
        assert_eq!(data["root_result"], "root");
        assert_eq!(data["results"].as_array().map(Vec::len), Some(store.len()));
        assert_eq!(data["requested_roots"], serde_json::json!(["root.region", "root.channel"]));
        Ok(())
    }

    #[test]
    fn test_data_covers_full_mapping() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        let web = out.path().join("web");
        let roots = vec![ResultId::parse("root.channel")?];

        let export = WebExporter::default().export(&store, &web, Some(&roots))?;

        assert_eq!(export.visited.len(), 2);
        assert_eq!(export.artifacts, 0);
        assert!(!web.join("results/root.region.bar.jpg").exists());
        let data = read_data(&web.join("result_data.js"))?;
        let ids: Vec<_> = data["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert!(ids.contains(&"root.region.bar".to_string()));
        assert_eq!(data["requested_roots"], serde_json::json!(["root.channel"]));
        Ok(())
    }

    #[test]
    fn test_existing_destination_requires_overwrite() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        let web = out.path().join("web");
        fs::create_dir_all(&web)?;
        fs::write(web.join("stale.txt"), b"old")?;

        let err = WebExporter::default().export(&store, &web, None).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        let exporter = WebExporter::new(WebOptions {
            overwrite: true,
            ..WebOptions::default()
        });
        exporter.export(&store, &web, None)?;
        assert!(!web.join("stale.txt").exists());
        assert!(web.join("index.html").is_file());
        Ok(())
    }

    #[test]
    fn test_overwrite_refuses_results_directory() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let results = tmp.path().join("results");
        let store = store_with_results(&results)?;
        store.persist()?;

        let exporter = WebExporter::new(WebOptions {
            overwrite: true,
            ..WebOptions::default()
        });
        for destination in [results.clone(), results.join("."), tmp.path().to_path_buf()] {
            let err = exporter.export(&store, &destination, None).unwrap_err();
            assert!(matches!(err, Error::UnsafeDestination { .. }), "{}", err);
        }

        assert!(store.snapshot_path().is_file());
        assert_eq!(fs::read(results.join("root.region.bar.jpg"))?, b"jpeg");
        assert!(!results.join("index.html").exists());
        Ok(())
    }

    #[test]
    fn test_overwrite_inside_results_directory() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        store.persist()?;
        let web = results.path().join("web");
        fs::create_dir_all(&web)?;

        let exporter = WebExporter::new(WebOptions {
            overwrite: true,
            ..WebOptions::default()
        });
        exporter.export(&store, &web, None)?;

        assert!(web.join("index.html").is_file());
        assert!(store.snapshot_path().is_file());
        Ok(())
    }

    #[test]
    fn test_missing_artifact_leaves_destination_alone() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        fs::remove_file(results.path().join("root.region.bar.jpg"))?;
        let web = out.path().join("web");
        fs::create_dir_all(&web)?;
        fs::write(web.join("keep.txt"), b"keep")?;

        let exporter = WebExporter::new(WebOptions {
            overwrite: true,
            ..WebOptions::default()
        });
        let err = exporter.export(&store, &web, None).unwrap_err();
        assert!(matches!(err, Error::MissingArtifact { .. }));
        assert!(web.join("keep.txt").exists());
        Ok(())
    }

    #[test]
    fn test_custom_names() -> anyhow::Result<()> {
        let results = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let store = store_with_results(results.path())?;
        let web = out.path().join("web");

        let exporter = WebExporter::new(WebOptions {
            data_file: "data.js".into(),
            global_name: "RESULTS".into(),
            overwrite: false,
        });
        exporter.export(&store, &web, None)?;

        let script = fs::read_to_string(web.join("data.js"))?;
        assert!(script.starts_with("var RESULTS = {"));
        assert!(fs::read_to_string(web.join("index.html"))?.contains("src=\"data.js\""));
        assert!(fs::read_to_string(web.join("app.js"))?.contains("var data = RESULTS;"));
        Ok(())
    }
}
