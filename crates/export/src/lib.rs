//! Exporters for a result store
//!
//! - `WebExporter`: browsable directory with a bundled viewer
//! - `DocumentExporter`: single flowing document (Word `.docx` or HTML)
//!
//! Both share the traversal in [`traverse`], which visits each node at most
//! once per export.

pub mod document;
pub mod docx;
pub mod html;
pub mod traverse;
pub mod web;

// Re-exports
pub use document::{DocumentExporter, DocumentFormat, DocumentOptions, DocumentSink};
pub use docx::DocxDocument;
pub use html::HtmlDocument;
pub use traverse::{resolve_roots, walk, Visitor};
pub use web::{WebExport, WebExporter, WebOptions, RESULTS_SUBDIR};
