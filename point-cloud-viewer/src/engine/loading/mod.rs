//! Content loading for the viewer scene.
//!
//! Loads are started through collaborator loaders, parked in a [`LoadQueue`]
//! and polled on the viewer's thread at the start of every tick. Completed
//! loads mutate the scene only from there, so a load that finishes after
//! `destroy` never reaches it.

/// Streaming point cloud slot and additive model set.
///
/// Owns the scene nodes that loaded content is placed into.
pub mod content;

/// In-flight loads and the pending result handed back to callers.
pub mod queue;

/// Loader traits, octree handles and relative path resolution.
pub mod sources;

pub use content::{LoadedModel, ModelContentSet, PointCloudOctree, ResidentPointCloud, ResidentSlot};
pub use queue::{CompletedModel, CompletedPointCloud, LoadQueue, LoadResponder, PendingPointCloud};
pub use sources::{LoadFuture, ModelLoader, ModelNode, OctreeHandle, PointCloudLoader, UrlResolver};
