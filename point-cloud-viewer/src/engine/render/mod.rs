//! Rendering boundary of the viewer.

/// Backend trait that sizes, clears and draws into the render surface.
pub mod backend;

pub use backend::RenderBackend;
