//! Shared defaults for the point cloud viewer workspace.
//!
//! Every value here is the fallback used when a `ViewerConfig` field is left
//! out of the JSON configuration.

pub mod camera;
pub mod coordinate_system;
pub mod gizmo;
pub mod lighting;
pub mod path;
