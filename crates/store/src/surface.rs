//! Plotting surface collaborator
//!
//! Figures created with [`PendingArtifact::CurrentSurface`](pr_core::PendingArtifact)
//! are rendered by whatever surface the store has attached, at the moment
//! the figure reaches [`ResultStore::add`](crate::ResultStore::add).

use pr_core::Result;

/// Source of "the currently active figure"
pub trait PlotSurface {
    /// Render the active figure to encoded image bytes
    fn capture(&mut self) -> Result<Vec<u8>>;
}

impl<F> PlotSurface for F
where
    F: FnMut() -> Result<Vec<u8>>,
{
    fn capture(&mut self) -> Result<Vec<u8>> {
        self()
    }
}
