use std::f32::consts::TAU;

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use crate::config::OrbitConfig;
use crate::host::PointerEvent;

/// Orbit input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitInputState {
    #[default]
    Idle,
    Rotating,
}

/// Camera parameterised by distance, azimuth and elevation around a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCamera {
    pub distance: f32,
    /// Rotation about +Y in radians, 0 looking down -Z.
    pub azimuth: f32,
    /// Angle above the XZ plane in radians.
    pub elevation: f32,
    pub target: Vec3,
}

impl SphericalCamera {
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + self.distance * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn pose(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, Vec3::Y)
    }
}

/// Turns pointer and wheel input into orbit camera motion.
///
/// Owns only the camera pose math; it never touches the scene.
#[derive(Debug, Clone)]
pub struct CameraControls {
    spherical: SphericalCamera,
    state: OrbitInputState,
    rotate_anchor: Vec2,
    enabled: bool,
    rotation_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl CameraControls {
    /// Builds controls from `config`. An unusable distance range is repaired
    /// first, so the clamp bounds are always positive and ordered.
    pub fn new(config: &OrbitConfig) -> Self {
        let mut config = *config;
        config.sanitise();
        Self {
            spherical: SphericalCamera {
                distance: config
                    .initial_distance
                    .clamp(config.min_distance, config.max_distance),
                azimuth: config.initial_azimuth,
                elevation: config.initial_elevation,
                target: config.target,
            },
            state: OrbitInputState::Idle,
            rotate_anchor: Vec2::ZERO,
            enabled: true,
            rotation_speed: config.rotation_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    /// Place and orient `camera` from the current spherical state.
    pub fn update(&self, camera: &mut Transform) {
        *camera = self.spherical.pose();
    }

    /// Negative deltas zoom in, positive deltas zoom out. The distance stays
    /// within the configured clamp.
    pub fn handle_wheel(&mut self, delta: f32) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        let factor = 1.0 + delta.abs() * self.zoom_speed;
        let distance = if delta < 0.0 {
            self.spherical.distance / factor
        } else {
            self.spherical.distance * factor
        };
        self.spherical.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        if event.button == MouseButton::Left {
            self.rotate_anchor = event.position;
            self.state = OrbitInputState::Rotating;
        }
    }

    /// Returns `true` if the camera rotated.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> bool {
        if !self.enabled || self.state != OrbitInputState::Rotating {
            return false;
        }
        let delta = (event.position - self.rotate_anchor) * self.rotation_speed;
        self.rotate_left(TAU * delta.x);
        self.rotate_up(TAU * delta.y);
        self.rotate_anchor = event.position;
        delta != Vec2::ZERO
    }

    pub fn on_pointer_up(&mut self) {
        self.state = OrbitInputState::Idle;
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical.azimuth -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical.elevation += angle;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled controls ignore pointer movement, even mid-rotation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn state(&self) -> OrbitInputState {
        self.state
    }

    pub fn spherical(&self) -> &SphericalCamera {
        &self.spherical
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.spherical.target = target;
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }
}
