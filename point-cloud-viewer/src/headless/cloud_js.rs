use std::collections::HashMap;

use bevy::prelude::*;
use constants::coordinate_system::transform_coordinates;
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::engine::camera::CameraView;
use crate::engine::loading::{LoadFuture, OctreeHandle, PointCloudLoader, UrlResolver};
use crate::engine::render::RenderBackend;
use crate::engine::scene::MeshBounds;
use crate::error::LoadError;
use crate::settings::PointCloudSettings;

/// Axis-aligned box as written in `cloud.js`, Z-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudJsBounds {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub ux: f64,
    pub uy: f64,
    pub uz: f64,
}

impl CloudJsBounds {
    /// The box in the Y-up scene frame.
    pub fn to_scene(&self) -> MeshBounds {
        let (ax, ay, az) = transform_coordinates(self.lx, self.ly, self.lz);
        let (bx, by, bz) = transform_coordinates(self.ux, self.uy, self.uz);
        MeshBounds::new(
            Vec3::new(ax as f32, ay as f32, az as f32),
            Vec3::new(bx as f32, by as f32, bz as f32),
        )
    }
}

/// Potree octree metadata. Only the fields the viewer uses are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudJsMetadata {
    pub version: String,
    pub octree_dir: String,
    #[serde(default)]
    pub points: u64,
    pub bounding_box: CloudJsBounds,
    #[serde(default)]
    pub tight_bounding_box: Option<CloudJsBounds>,
    pub spacing: f64,
    pub scale: f64,
    #[serde(default)]
    pub hierarchy_step_size: u32,
    /// Either a format name (`"LAZ"`) or a list of attribute names.
    #[serde(default)]
    pub point_attributes: serde_json::Value,
}

impl CloudJsMetadata {
    /// Tight bounds when present, the octree cube otherwise.
    pub fn scene_bounds(&self) -> MeshBounds {
        self.tight_bounding_box
            .as_ref()
            .unwrap_or(&self.bounding_box)
            .to_scene()
    }
}

/// A cloud whose metadata has been read.
#[derive(Debug, Clone)]
pub struct OpenedCloud {
    pub url: String,
    pub octree_url: String,
    pub metadata: CloudJsMetadata,
    pub material: PointCloudSettings,
    /// Camera to bounds-centre distance at the last visibility refresh.
    pub camera_distance: Option<f32>,
}

/// Reads Potree `cloud.js` metadata from the filesystem. Node data is not
/// streamed; the visibility refresh only tracks the camera distance.
#[derive(Debug, Default)]
pub struct CloudJsLoader {
    next_id: u64,
    clouds: HashMap<OctreeHandle, OpenedCloud>,
}

impl CloudJsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, octree: OctreeHandle) -> Option<&OpenedCloud> {
        self.clouds.get(&octree)
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    fn open(&mut self, content_id: &str, resolver: &UrlResolver) -> Result<OctreeHandle, LoadError> {
        let url = resolver.resolve(content_id);
        let metadata: CloudJsMetadata = read_json(&url)?;
        let octree_url = resolver.resolve(&metadata.octree_dir);

        self.next_id += 1;
        let octree = OctreeHandle(self.next_id);
        info!(
            "opened point cloud {} (v{}, {} points, spacing {})",
            url, metadata.version, metadata.points, metadata.spacing
        );
        self.clouds.insert(
            octree,
            OpenedCloud {
                url,
                octree_url,
                metadata,
                material: PointCloudSettings::default(),
                camera_distance: None,
            },
        );
        Ok(octree)
    }
}

impl PointCloudLoader for CloudJsLoader {
    fn load(&mut self, content_id: &str, resolver: UrlResolver) -> LoadFuture<OctreeHandle> {
        let result = self.open(content_id, &resolver);
        Box::pin(futures::future::ready(result))
    }

    fn update_visibility(
        &mut self,
        resident: &[OctreeHandle],
        camera: &CameraView,
        renderer: &dyn RenderBackend,
    ) {
        for octree in resident {
            let Some(cloud) = self.clouds.get_mut(octree) else {
                continue;
            };
            let centre = cloud.metadata.scene_bounds().center();
            let distance = camera.position().distance(centre);
            cloud.camera_distance = Some(distance);
            trace!(
                "{:?} on {:?}: camera distance {:.2}",
                octree,
                renderer.surface(),
                distance
            );
        }
    }

    fn apply_material(&mut self, octree: OctreeHandle, settings: &PointCloudSettings) {
        if let Some(cloud) = self.clouds.get_mut(&octree) {
            cloud.material = *settings;
        }
    }
}
