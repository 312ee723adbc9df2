use bevy::prelude::*;

use super::graph::{NodeKind, SceneGraph};
use crate::config::{LightRig, LightSpec};

/// Light parameters attached to light nodes. Colours are `0xRRGGBB`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub colour: u32,
    pub intensity: f32,
}

impl LightSource {
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.colour >> 16) & 0xff) as f32 / 255.0,
            ((self.colour >> 8) & 0xff) as f32 / 255.0,
            (self.colour & 0xff) as f32 / 255.0,
        ]
    }
}

/// Ambient plus key and fill directional lights added while the viewer is
/// bound.
#[derive(Debug, Clone, Copy)]
pub struct InstalledLights {
    pub ambient: Entity,
    pub key: Entity,
    pub fill: Entity,
}

impl InstalledLights {
    pub fn spawn(scene: &mut SceneGraph, rig: &LightRig) -> Self {
        let ambient = scene.add(
            NodeKind::AmbientLight,
            Transform::default(),
            (source(&rig.ambient), Name::new("ambient_light")),
        );
        let key = spawn_directional(scene, &rig.key, "key_light");
        let fill = spawn_directional(scene, &rig.fill, "fill_light");
        Self { ambient, key, fill }
    }

    pub fn despawn(self, scene: &mut SceneGraph) {
        for entity in [self.ambient, self.key, self.fill] {
            scene.remove(entity);
        }
    }
}

fn source(spec: &LightSpec) -> LightSource {
    LightSource {
        colour: spec.colour,
        intensity: spec.intensity,
    }
}

/// Directional lights shine from `position` towards the origin.
fn spawn_directional(scene: &mut SceneGraph, spec: &LightSpec, name: &'static str) -> Entity {
    let transform = Transform::from_translation(spec.position).looking_at(Vec3::ZERO, Vec3::Y);
    scene.add(
        NodeKind::DirectionalLight,
        transform,
        (source(spec), Name::new(name)),
    )
}
