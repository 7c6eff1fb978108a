//! Flowing-document export
//!
//! Every visited node becomes a heading at its traversal depth, followed by
//! the figure image or the table (with its `pre`/`post` paragraphs). The
//! document is assembled in memory and written in one atomic step, so a
//! failed export never leaves a partial file behind.
//!
//! Word (`.docx`) is the default output; `.html`/`.htm` outputs get a
//! self-contained HTML page instead.

use crate::docx::DocxDocument;
use crate::html::HtmlDocument;
use crate::traverse::{resolve_roots, walk, Visitor};
use pr_core::{Error, Figure, Result, ResultId, ResultNode, Table};
use pr_store::snapshot::atomic_write;
use pr_store::ResultStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Output format driven by the document exporter
pub trait DocumentSink {
    /// Heading at `level` (0 = top-level requested root)
    fn heading(&mut self, text: &str, level: usize);

    fn paragraph(&mut self, text: &str);

    /// Embed an encoded image, scaled to `width_px`
    fn picture(&mut self, image: &[u8], filename: &str, width_px: u32);

    /// Header row plus data rows
    fn table(&mut self, headings: &[String], rows: &[Vec<String>]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Html,
}

impl DocumentFormat {
    /// Format implied by the output extension (anything but HTML is Word)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("html" | "htm") => DocumentFormat::Html,
            _ => DocumentFormat::Docx,
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(DocumentFormat::Docx),
            "html" | "htm" => Ok(DocumentFormat::Html),
            other => Err(Error::validation(format!(
                "Unknown document format '{}': expected docx or html",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Fixed width of embedded figures (default: 576px, 6in at 96dpi)
    pub image_width_px: u32,
    /// Optional document title
    pub title: Option<String>,
    /// Output format; `None` picks it from the output extension
    pub format: Option<DocumentFormat>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            image_width_px: 576,
            title: None,
            format: None,
        }
    }
}

struct DocumentVisitor<'a, S> {
    sink: &'a mut S,
    image_width_px: u32,
}

impl<S: DocumentSink> Visitor for DocumentVisitor<'_, S> {
    fn heading(&mut self, node: &ResultNode, depth: usize) -> Result<()> {
        self.sink.heading(&node.name, depth);
        Ok(())
    }

    fn figure(&mut self, _node: &ResultNode, figure: &Figure, artifact: &Path) -> Result<()> {
        let image = fs::read(artifact)?;
        self.sink.picture(&image, &figure.filename, self.image_width_px);
        Ok(())
    }

    fn table(&mut self, _node: &ResultNode, table: &Table) -> Result<()> {
        if !table.pre.is_empty() {
            self.sink.paragraph(&table.pre);
        }
        self.sink.table(&table.headings, &table.rows);
        if !table.post.is_empty() {
            self.sink.paragraph(&table.post);
        }
        Ok(())
    }
}

pub struct DocumentExporter {
    options: DocumentOptions,
}

impl DocumentExporter {
    pub fn new(options: DocumentOptions) -> Self {
        Self { options }
    }

    /// Render `requested` (or every child of the root) into `sink`
    pub fn render<S: DocumentSink>(
        &self,
        store: &ResultStore,
        requested: Option<&[ResultId]>,
        sink: &mut S,
    ) -> Result<Vec<ResultId>> {
        let roots = resolve_roots(store, requested)?;
        let mut visitor = DocumentVisitor {
            sink,
            image_width_px: self.options.image_width_px,
        };
        walk(store, &roots, &mut visitor)
    }

    /// Render to a Word or HTML document at `output`
    pub fn export(
        &self,
        store: &ResultStore,
        output: &Path,
        requested: Option<&[ResultId]>,
    ) -> Result<Vec<ResultId>> {
        let title = self.options.title.as_deref();
        let format = self
            .options
            .format
            .unwrap_or_else(|| DocumentFormat::from_path(output));

        let (visited, bytes) = match format {
            DocumentFormat::Docx => {
                let mut document = DocxDocument::new(title);
                let visited = self.render(store, requested, &mut document)?;
                (visited, document.finish()?)
            }
            DocumentFormat::Html => {
                let mut document = HtmlDocument::new(title);
                let visited = self.render(store, requested, &mut document)?;
                (visited, document.finish().into_bytes())
            }
        };
        atomic_write(output, &bytes)?;
        info!(
            "Wrote {:?} document with {} results to {}",
            format,
            visited.len(),
            output.display()
        );
        Ok(visited)
    }
}

impl Default for DocumentExporter {
    fn default() -> Self {
        Self::new(DocumentOptions::default())
    }
}
