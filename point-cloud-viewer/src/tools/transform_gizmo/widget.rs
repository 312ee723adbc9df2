use bevy::prelude::*;

use super::state::GizmoMode;
use crate::engine::camera::CameraView;
use crate::host::SurfaceId;

/// Pointer phase forwarded to gizmo widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A translate/rotate/scale handle attached to one scene node.
pub trait TransformGizmo {
    fn attach(&mut self, target: Entity);

    fn detach(&mut self);

    fn set_mode(&mut self, mode: GizmoMode);

    /// On-screen size of the handles, in the widget's own units.
    fn set_size(&mut self, size: f32);

    /// Pointer input over the render surface. `ray` is `None` when the
    /// pointer cannot be mapped into the view.
    fn handle_pointer(&mut self, phase: PointerPhase, ray: Option<Ray3d>);

    /// Drag state if it changed since the last call.
    fn take_dragging_changed(&mut self) -> Option<bool>;
}

/// Builds gizmo widgets bound to a camera and render surface.
pub trait GizmoFactory {
    fn create(&mut self, camera: &CameraView, surface: SurfaceId) -> Box<dyn TransformGizmo>;
}
