//! Scene container and the light rig installed into it.
//!
//! The scene is a Bevy `World`: every node is an entity carrying a
//! [`NodeKind`](graph::NodeKind) and a `Transform`, parented with `ChildOf`.
//! Top-level nodes are additionally tracked in insertion order so traversal
//! matches the order content was added.

/// Entity-backed scene graph with ordered top-level nodes.
pub mod graph;

/// Ambient and directional light rig.
pub mod lighting;

pub use graph::{MeshBounds, NodeKind, SceneGraph};
pub use lighting::{InstalledLights, LightSource};
