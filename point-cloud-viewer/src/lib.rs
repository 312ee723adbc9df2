//! Point cloud and building model viewer core.
//!
//! Composes a streaming level-of-detail point cloud loader and a model
//! loader into one scene, navigated with an orbit camera and edited through
//! transform gizmos attached by double-click picking. Rendering, loading,
//! host windowing and gizmo widgets are collaborators behind traits; the
//! [`headless`] module provides in-process implementations of all of them.

pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod host;
pub mod settings;
pub mod tools;

pub use config::ViewerConfig;
pub use engine::core::{Viewer, ViewerBackends};
pub use error::{ConfigError, LoadError};
pub use settings::{PointCloudSettings, SettingsStore};
