use std::future::Future;
use std::pin::Pin;

use bevy::prelude::*;

use crate::engine::camera::CameraView;
use crate::engine::render::backend::RenderBackend;
use crate::engine::scene::{MeshBounds, NodeKind};
use crate::error::LoadError;
use crate::settings::PointCloudSettings;

/// Result of an asynchronous load, resumed on the viewer's thread.
pub type LoadFuture<T> = Pin<Box<dyn Future<Output = Result<T, LoadError>>>>;

/// Identifies one streaming point cloud owned by a [`PointCloudLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OctreeHandle(pub u64);

/// Resolves relative asset paths against a base location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base: String,
}

impl UrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn resolve(&self, relative: &str) -> String {
        format!("{}{}", self.base, relative)
    }
}

/// Streaming level-of-detail point cloud loader.
pub trait PointCloudLoader {
    fn load(&mut self, content_id: &str, resolver: UrlResolver) -> LoadFuture<OctreeHandle>;

    /// Refresh the visible level of detail of every resident cloud for the
    /// given camera. Called once per frame, after the camera moved.
    fn update_visibility(
        &mut self,
        resident: &[OctreeHandle],
        camera: &CameraView,
        renderer: &dyn RenderBackend,
    );

    fn apply_material(&mut self, octree: OctreeHandle, settings: &PointCloudSettings);
}

/// A node of a loaded building model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub bounds: Option<MeshBounds>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn mesh(name: impl Into<String>, bounds: MeshBounds) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh,
            transform: Transform::default(),
            bounds: Some(bounds),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<ModelNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            transform: Transform::default(),
            bounds: None,
            children,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Mesh/model loader.
pub trait ModelLoader {
    /// Location of auxiliary runtime assets. Set once before the first load.
    fn set_runtime_asset_path(&mut self, path: &str);

    fn load(&mut self, url: &str) -> LoadFuture<ModelNode>;
}
