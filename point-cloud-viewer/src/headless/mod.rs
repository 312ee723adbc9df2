//! In-process collaborators for running the viewer without a window or GPU.
//!
//! The loaders read real files: Potree `cloud.js` metadata for point clouds
//! and a small JSON node tree for models. The renderer, host and mount record
//! what they are asked to do so a driver can inspect the outcome.

/// Potree `cloud.js` metadata loader.
pub mod cloud_js;

/// JSON model description loader.
pub mod model_json;

/// Renderer, host window, mount point and gizmo stand-ins.
pub mod surface;

use std::io::ErrorKind;

use serde::de::DeserializeOwned;

use crate::error::LoadError;

pub use cloud_js::{CloudJsBounds, CloudJsLoader, CloudJsMetadata, OpenedCloud};
pub use model_json::{JsonModelLoader, ModelDocument};
pub use surface::{
    HeadlessHost, HeadlessMount, HeadlessRenderer, NullGizmo, NullGizmoFactory, RenderStats,
};

pub(crate) fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_string()),
        _ => LoadError::Io {
            path: path.to_string(),
            source,
        },
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_string(),
        source,
    })
}
