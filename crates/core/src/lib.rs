//! prettyresults core - entity model for the result tree
//!
//! This crate provides:
//! - Fully-qualified result IDs
//! - Result nodes (container, figure, table) and their labels
//! - Table construction from grids, series and labelled frames
//! - The error taxonomy shared by the store and the exporters

pub mod error;
pub mod id;
pub mod node;
pub mod table;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use id::{validate_segment, ResultId, ROOT, SEPARATOR};
pub use node::{Figure, Label, NodeKind, PendingArtifact, ResultNode};
pub use table::{Frame, Table, KEY_VALUE_HEADINGS};
