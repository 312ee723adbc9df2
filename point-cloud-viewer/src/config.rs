//! Viewer configuration.
//!
//! Every field falls back to the workspace `constants` crate, so a partial
//! JSON document (or none at all) yields a working viewer.

use std::path::Path;

use bevy::prelude::*;
use constants::{camera, gizmo, lighting, path};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tools::transform_gizmo::GizmoPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: LensConfig,
    pub orbit: OrbitConfig,
    pub lights: LightRig,
    pub gizmo: GizmoConfig,
    /// Handed to the model loader once, before the first model load.
    pub runtime_asset_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: LensConfig::default(),
            orbit: OrbitConfig::default(),
            lights: LightRig::default(),
            gizmo: GizmoConfig::default(),
            runtime_asset_path: path::RUNTIME_ASSET_PATH.to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: ViewerConfig = serde_json::from_str(json)?;
        config.orbit.sanitise();
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Perspective lens parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            fov_degrees: camera::FOV_DEGREES,
            near: camera::NEAR_PLANE,
            far: camera::FAR_PLANE,
            zoom: camera::ZOOM,
        }
    }
}

/// Orbit camera tuning and the distance clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub rotation_speed: f32,
    pub zoom_speed: f32,
    pub initial_distance: f32,
    pub initial_azimuth: f32,
    pub initial_elevation: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub target: Vec3,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotation_speed: camera::ROTATION_SPEED,
            zoom_speed: camera::ZOOM_SPEED,
            initial_distance: camera::INITIAL_DISTANCE,
            initial_azimuth: camera::INITIAL_AZIMUTH,
            initial_elevation: camera::INITIAL_ELEVATION,
            min_distance: camera::MIN_DISTANCE,
            max_distance: camera::MAX_DISTANCE,
            target: Vec3::ZERO,
        }
    }
}

impl OrbitConfig {
    /// Repair a clamp range that would let the distance reach zero, go
    /// non-finite or invert.
    pub fn sanitise(&mut self) {
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            warn!(
                "orbit min_distance {} is not positive, using {}",
                self.min_distance,
                camera::MIN_DISTANCE
            );
            self.min_distance = camera::MIN_DISTANCE;
        }
        if !self.max_distance.is_finite() || self.max_distance < self.min_distance {
            warn!(
                "orbit max_distance {} is invalid, using {}",
                self.max_distance,
                camera::MAX_DISTANCE.max(self.min_distance)
            );
            self.max_distance = camera::MAX_DISTANCE.max(self.min_distance);
        }
        self.initial_distance = if self.initial_distance.is_finite() {
            self.initial_distance
                .clamp(self.min_distance, self.max_distance)
        } else {
            camera::INITIAL_DISTANCE.clamp(self.min_distance, self.max_distance)
        };
    }
}

/// A light with a hex colour, e.g. `0xffeeff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSpec {
    pub colour: u32,
    pub intensity: f32,
    /// Ignored for ambient lights.
    #[serde(default)]
    pub position: Vec3,
}

/// Ambient fill plus two directional lights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub ambient: LightSpec,
    pub key: LightSpec,
    pub fill: LightSpec,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: LightSpec {
                colour: lighting::AMBIENT_COLOUR,
                intensity: lighting::AMBIENT_INTENSITY,
                position: Vec3::ZERO,
            },
            key: LightSpec {
                colour: lighting::KEY_LIGHT_COLOUR,
                intensity: lighting::KEY_LIGHT_INTENSITY,
                position: Vec3::from_array(lighting::KEY_LIGHT_POSITION),
            },
            fill: LightSpec {
                colour: lighting::FILL_LIGHT_COLOUR,
                intensity: lighting::FILL_LIGHT_INTENSITY,
                position: Vec3::from_array(lighting::FILL_LIGHT_POSITION),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    pub policy: GizmoPolicy,
    pub apparent_size: f32,
    pub max_fov_factor: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            policy: GizmoPolicy::Single,
            apparent_size: gizmo::APPARENT_SIZE,
            max_fov_factor: gizmo::MAX_FOV_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config.camera, LensConfig::default());
        assert_eq!(config.orbit, OrbitConfig::default());
        assert_eq!(config.gizmo.policy, GizmoPolicy::Single);
        assert_eq!(config.runtime_asset_path, "./assets/");
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = ViewerConfig::from_json_str(
            r#"{ "camera": { "fov_degrees": 70.0 }, "gizmo": { "policy": "multi" } }"#,
        )
        .unwrap();
        assert_eq!(config.camera.fov_degrees, 70.0);
        assert_eq!(config.camera.near, constants::camera::NEAR_PLANE);
        assert_eq!(config.gizmo.policy, GizmoPolicy::Multi);
    }

    #[test]
    fn invalid_clamp_range_is_repaired() {
        let config = ViewerConfig::from_json_str(
            r#"{ "orbit": { "min_distance": -1.0, "max_distance": 0.01, "initial_distance": 900.0 } }"#,
        )
        .unwrap();
        assert!(config.orbit.min_distance > 0.0);
        assert!(config.orbit.max_distance >= config.orbit.min_distance);
        assert!(config.orbit.initial_distance <= config.orbit.max_distance);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ViewerConfig::from_json_str("{ camera: 1 "),
            Err(ConfigError::Json(_))
        ));
    }
}
