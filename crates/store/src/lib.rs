//! Result store and tree builder
//!
//! This crate provides:
//! - `ResultStore`: ID-indexed ownership of every result node
//! - Reload from the snapshot with merge-on-re-add of containers
//! - Atomic snapshot persistence and figure artifact writes
//! - `Container`: the builder API that grows the tree

pub mod builder;
pub mod snapshot;
pub mod store;
pub mod surface;

// Re-exports
pub use builder::Container;
pub use snapshot::{NodeRecord, SnapshotFile};
pub use store::{ContainerSpec, ResultStore, StoreOptions, ROOT_NAME};
pub use surface::PlotSurface;
