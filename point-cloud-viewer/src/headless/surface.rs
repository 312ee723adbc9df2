use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bevy::prelude::*;

use crate::engine::camera::CameraView;
use crate::engine::render::RenderBackend;
use crate::engine::scene::SceneGraph;
use crate::host::{FrameRequest, HostEventKind, HostWindow, ListenerHandle, MountPoint, SurfaceId};
use crate::tools::transform_gizmo::{GizmoFactory, GizmoMode, PointerPhase, TransformGizmo};

/// Counters kept by [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub size: (u32, u32),
    pub clears: u64,
    pub frames: u64,
    /// Top-level node count seen by the last draw.
    pub last_node_count: usize,
    pub last_camera_position: Vec3,
}

/// Renderer that draws nothing and counts what it was asked to do.
pub struct HeadlessRenderer {
    surface: SurfaceId,
    stats: Rc<RefCell<RenderStats>>,
}

impl HeadlessRenderer {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            stats: Rc::default(),
        }
    }

    /// Shared view of the counters, readable after the renderer is handed
    /// to a viewer.
    pub fn stats(&self) -> Rc<RefCell<RenderStats>> {
        self.stats.clone()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn surface(&self) -> SurfaceId {
        self.surface
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.stats.borrow_mut().size = (width, height);
    }

    fn clear(&mut self) {
        self.stats.borrow_mut().clears += 1;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &CameraView) {
        let mut stats = self.stats.borrow_mut();
        stats.frames += 1;
        stats.last_node_count = scene.roots().len();
        stats.last_camera_position = camera.position();
    }
}

#[derive(Debug, Default)]
struct HostState {
    next_listener: u64,
    next_frame: u64,
    listeners: Vec<(ListenerHandle, HostEventKind)>,
    frames: Vec<FrameRequest>,
}

/// In-process host window. Clones share state, so one clone can be handed
/// to the viewer while the driver keeps another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest frame request still outstanding.
    pub fn take_frame(&self) -> Option<FrameRequest> {
        let mut state = self.state.borrow_mut();
        if state.frames.is_empty() {
            None
        } else {
            Some(state.frames.remove(0))
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn is_subscribed(&self, kind: HostEventKind) -> bool {
        self.state.borrow().listeners.iter().any(|(_, k)| *k == kind)
    }
}

impl HostWindow for HeadlessHost {
    fn subscribe(&mut self, kind: HostEventKind) -> ListenerHandle {
        let mut state = self.state.borrow_mut();
        state.next_listener += 1;
        let handle = ListenerHandle(state.next_listener);
        state.listeners.push((handle, kind));
        handle
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        self.state.borrow_mut().listeners.retain(|(h, _)| *h != handle);
    }

    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_frame += 1;
        let request = FrameRequest(state.next_frame);
        state.frames.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.state.borrow_mut().frames.retain(|r| *r != request);
    }
}

/// Mount point with a fixed client rectangle.
#[derive(Debug)]
pub struct HeadlessMount {
    rect: Cell<Rect>,
    surfaces: RefCell<Vec<SurfaceId>>,
}

impl HeadlessMount {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            rect: Cell::new(Rect::new(0.0, 0.0, width, height)),
            surfaces: RefCell::default(),
        }
    }

    pub fn set_size(&self, width: f32, height: f32) {
        let min = self.rect.get().min;
        self.rect.set(Rect::from_corners(min, min + Vec2::new(width, height)));
    }

    pub fn surfaces(&self) -> Vec<SurfaceId> {
        self.surfaces.borrow().clone()
    }
}

impl MountPoint for HeadlessMount {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }

    fn append_surface(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().push(surface);
    }

    fn remove_surface(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().retain(|s| *s != surface);
    }
}

/// Gizmo without handles: it can be attached and sized but never drags.
#[derive(Debug, Default)]
pub struct NullGizmo {
    target: Option<Entity>,
    mode: GizmoMode,
    size: f32,
}

impl NullGizmo {
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl TransformGizmo for NullGizmo {
    fn attach(&mut self, target: Entity) {
        self.target = Some(target);
    }

    fn detach(&mut self) {
        self.target = None;
    }

    fn set_mode(&mut self, mode: GizmoMode) {
        debug!("gizmo on {:?} switched to {:?}", self.target, mode);
        self.mode = mode;
    }

    fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    fn handle_pointer(&mut self, _phase: PointerPhase, _ray: Option<Ray3d>) {}

    fn take_dragging_changed(&mut self) -> Option<bool> {
        None
    }
}

#[derive(Debug, Default)]
pub struct NullGizmoFactory {
    created: usize,
}

impl NullGizmoFactory {
    pub fn created(&self) -> usize {
        self.created
    }
}

impl GizmoFactory for NullGizmoFactory {
    fn create(&mut self, _camera: &CameraView, surface: SurfaceId) -> Box<dyn TransformGizmo> {
        self.created += 1;
        trace!("creating gizmo #{} on {:?}", self.created, surface);
        Box::new(NullGizmo::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_clones_share_frames_and_listeners() {
        let driver = HeadlessHost::new();
        let mut viewer_side = driver.clone();

        let handle = viewer_side.subscribe(HostEventKind::Wheel);
        let first = viewer_side.request_frame();
        let second = viewer_side.request_frame();
        viewer_side.cancel_frame(first);

        assert!(driver.is_subscribed(HostEventKind::Wheel));
        assert_eq!(driver.take_frame(), Some(second));
        assert_eq!(driver.take_frame(), None);

        viewer_side.unsubscribe(handle);
        assert_eq!(driver.listener_count(), 0);
    }

    #[test]
    fn mount_tracks_surfaces_and_size() {
        let mount = HeadlessMount::new(800.0, 600.0);
        mount.append_surface(SurfaceId(3));
        assert_eq!(mount.surfaces(), vec![SurfaceId(3)]);
        mount.remove_surface(SurfaceId(3));
        assert!(mount.surfaces().is_empty());

        mount.set_size(1024.0, 768.0);
        assert_eq!(mount.bounding_rect().size(), Vec2::new(1024.0, 768.0));
    }
}
