use bevy::prelude::*;

use crate::engine::scene::{MeshBounds, SceneGraph};

/// One ray hit against a node's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub entity: Entity,
    /// World-space distance from the ray origin.
    pub distance: f32,
    pub point: Vec3,
}

/// Ray against bounds placed by `world`. Returns the world-space distance to
/// the entry point, or the exit point if the origin is inside.
pub fn ray_hits_obb(ray: &Ray3d, world: Mat4, bounds: &MeshBounds) -> Option<f32> {
    let inv = world.inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(ray.direction.as_vec3());
    let t = ray_aabb_hit_t(o_local, d_local, bounds.min, bounds.max)?;
    let hit = world.transform_point3(o_local + d_local * t);
    Some(hit.distance(ray.origin))
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    for axis in 0..3 {
        if inv[axis].is_infinite() {
            // Parallel to this slab: inside it or never.
            if ray_origin[axis] < min[axis] || ray_origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let (mut near, mut far) = (
            (min[axis] - ray_origin[axis]) * inv[axis],
            (max[axis] - ray_origin[axis]) * inv[axis],
        );
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        tmin = tmin.max(near);
        tmax = tmax.min(far);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Every bounded node in `root`'s subtree the ray passes through, nearest
/// first.
pub fn intersect_node(scene: &SceneGraph, root: Entity, ray: &Ray3d) -> Vec<Intersection> {
    let mut hits: Vec<Intersection> = scene
        .subtree(root)
        .into_iter()
        .filter_map(|entity| {
            let bounds = scene.get::<MeshBounds>(entity)?;
            let world = scene.world_matrix(entity)?;
            let distance = ray_hits_obb(ray, world, bounds)?;
            Some(Intersection {
                entity,
                distance,
                point: ray.get_point(distance),
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
