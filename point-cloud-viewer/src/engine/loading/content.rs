use bevy::prelude::*;
use constants::coordinate_system::{DEMO_CLOUD_OFFSET_X, Z_UP_TO_Y_UP_RADIANS};

use super::sources::{ModelNode, OctreeHandle};
use crate::engine::scene::{NodeKind, SceneGraph};

/// Marks the scene node that stands for a streaming point cloud.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointCloudOctree {
    pub handle: OctreeHandle,
}

/// Marks the root node of a loaded model.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LoadedModel {
    pub url: String,
}

/// What a successful point cloud load resolves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentPointCloud {
    pub entity: Entity,
    pub octree: OctreeHandle,
}

impl ResidentPointCloud {
    /// Demo placement: shift along local X and turn the Z-up cloud Y-up.
    pub fn apply_demo_placement(transform: &mut Transform) {
        let local_x = transform.rotation * Vec3::X;
        transform.translation += local_x * DEMO_CLOUD_OFFSET_X;
        transform.rotate_local_x(Z_UP_TO_Y_UP_RADIANS);
    }
}

/// Holds at most one resident streaming point cloud. A new cloud replaces
/// the previous one; the slot removes exactly the node it added.
#[derive(Debug, Default)]
pub struct ResidentSlot {
    current: Option<ResidentPointCloud>,
}

impl ResidentSlot {
    pub fn replace(
        &mut self,
        scene: &mut SceneGraph,
        octree: OctreeHandle,
        content_id: &str,
    ) -> ResidentPointCloud {
        if let Some(previous) = self.clear(scene) {
            debug!(
                "replacing resident point cloud {:?} with {:?}",
                previous.octree, octree
            );
        }

        let entity = scene.add(
            NodeKind::Group,
            Transform::default(),
            (
                PointCloudOctree { handle: octree },
                Name::new(content_id.to_string()),
            ),
        );
        scene.add_child(entity, NodeKind::Points, Transform::default(), ());

        let resident = ResidentPointCloud { entity, octree };
        self.current = Some(resident);
        resident
    }

    /// Remove the resident cloud from the scene and empty the slot.
    pub fn clear(&mut self, scene: &mut SceneGraph) -> Option<ResidentPointCloud> {
        let previous = self.current.take()?;
        scene.remove(previous.entity);
        Some(previous)
    }

    pub fn current(&self) -> Option<ResidentPointCloud> {
        self.current
    }

    /// Octree handles for the per-frame visibility refresh.
    pub fn handles(&self) -> Vec<OctreeHandle> {
        self.current.iter().map(|r| r.octree).collect()
    }
}

/// Models added to the scene. Purely additive.
#[derive(Debug, Default)]
pub struct ModelContentSet {
    roots: Vec<Entity>,
}

impl ModelContentSet {
    pub fn insert(&mut self, scene: &mut SceneGraph, url: &str, model: &ModelNode) -> Entity {
        let root = scene.add(
            model.kind,
            model.transform,
            (
                LoadedModel {
                    url: url.to_string(),
                },
                Name::new(model.name.clone()),
            ),
        );
        if let Some(bounds) = model.bounds {
            scene.world_mut().entity_mut(root).insert(bounds);
        }
        for child in &model.children {
            spawn_model_node(scene, root, child);
        }
        self.roots.push(root);
        root
    }

    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn spawn_model_node(scene: &mut SceneGraph, parent: Entity, node: &ModelNode) {
    let Some(entity) = scene.add_child(
        parent,
        node.kind,
        node.transform,
        Name::new(node.name.clone()),
    ) else {
        return;
    };
    if let Some(bounds) = node.bounds {
        scene.world_mut().entity_mut(entity).insert(bounds);
    }
    for child in &node.children {
        spawn_model_node(scene, entity, child);
    }
}
