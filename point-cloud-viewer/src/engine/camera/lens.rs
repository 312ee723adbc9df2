use bevy::prelude::*;

use crate::config::LensConfig;

/// Perspective projection of the scene camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveLens {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
}

impl PerspectiveLens {
    pub fn from_config(config: &LensConfig, aspect: f32) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            zoom: config.zoom,
        }
    }

    /// Set the aspect from a surface size. Degenerate sizes leave the aspect
    /// untouched.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> bool {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.aspect = width / height;
            true
        } else {
            false
        }
    }

    /// Effective vertical field of view in radians, zoom applied.
    pub fn fov_y_radians(&self) -> f32 {
        let half = (self.fov_degrees.to_radians() * 0.5).tan() / self.zoom.max(f32::EPSILON);
        2.0 * half.atan()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians(), self.aspect, self.near, self.far)
    }
}

/// Camera pose and lens as seen by collaborators for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub transform: Transform,
    pub lens: PerspectiveLens,
}

impl CameraView {
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.transform.compute_matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.lens.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalised device coordinates
    /// (x right, y up, both in `[-1, 1]`).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let origin = self.position();
        let direction = Dir3::new(through - origin).ok()?;
        Some(Ray3d { origin, direction })
    }

    /// Distance-invariant factor used to keep on-screen widgets a constant
    /// apparent size.
    pub fn fov_size_factor(&self, scale: f32, max: f32) -> f32 {
        (scale * (self.lens.fov_degrees.to_radians() * 0.5).tan() / self.lens.zoom).min(max)
    }
}

/// Map a pointer position inside `rect` to normalised device coordinates.
pub fn pointer_to_ndc(position: Vec2, rect: Rect) -> Option<Vec2> {
    let size = rect.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let local = position - rect.min;
    Some(Vec2::new(
        local.x / size.x * 2.0 - 1.0,
        -(local.y / size.y) * 2.0 + 1.0,
    ))
}
