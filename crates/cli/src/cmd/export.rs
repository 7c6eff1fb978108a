//! Export results to a browsable site or a single document

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pr_export::{DocumentExporter, DocumentFormat, WebExporter};
use std::path::Path;
use tracing::warn;

pub fn web(
    dir: &Path,
    destination: &Path,
    roots: &[String],
    overwrite: bool,
    open_browser: bool,
) -> Result<()> {
    let (config, store) = util::open_store(dir)?;
    let roots = util::parse_ids(roots)?;

    let export = WebExporter::new(config.web_options(overwrite))
        .export(&store, destination, roots.as_deref())
        .with_context(|| format!("Web export to {} failed", destination.display()))?;

    println!(
        "{} Exported {} results ({} figures) to {}",
        "✓".green(),
        export.visited.len(),
        export.artifacts,
        export.directory.display()
    );

    let index = destination.join("index.html");
    if open_browser {
        // Browser failures only warn
        match open::that(&index) {
            Ok(()) => println!("{}", format!("Opened {}", index.display()).dimmed()),
            Err(e) => {
                warn!("Could not open {} in a browser: {}", index.display(), e);
                println!("{}", format!("Open {}", index.display()).dimmed());
            }
        }
    } else {
        println!("{}", format!("Open {}", index.display()).dimmed());
    }
    Ok(())
}

pub fn doc(
    dir: &Path,
    output: &Path,
    roots: &[String],
    format: Option<DocumentFormat>,
) -> Result<()> {
    let (config, store) = util::open_store(dir)?;
    let roots = util::parse_ids(roots)?;
    let mut options = config.document_options();
    if format.is_some() {
        options.format = format;
    }

    let visited = DocumentExporter::new(options)
        .export(&store, output, roots.as_deref())
        .with_context(|| format!("Document export to {} failed", output.display()))?;

    println!(
        "{} Wrote {} results to {}",
        "✓".green(),
        visited.len(),
        output.display()
    );
    Ok(())
}
