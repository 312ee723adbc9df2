#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use futures::channel::oneshot;

use point_cloud_viewer::engine::camera::CameraView;
use point_cloud_viewer::engine::loading::{
    LoadFuture, ModelLoader, ModelNode, OctreeHandle, PointCloudLoader, UrlResolver,
};
use point_cloud_viewer::engine::render::RenderBackend;
use point_cloud_viewer::engine::scene::{MeshBounds, SceneGraph};
use point_cloud_viewer::host::{
    FrameRequest, HostEventKind, HostWindow, ListenerHandle, MountPoint, SurfaceId,
};
use point_cloud_viewer::tools::transform_gizmo::{
    GizmoFactory, GizmoMode, PointerPhase, TransformGizmo,
};
use point_cloud_viewer::{
    LoadError, PointCloudSettings, SettingsStore, Viewer, ViewerBackends, ViewerConfig,
};

pub const SURFACE: SurfaceId = SurfaceId(42);

/// Calls made on collaborators, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSize(u32, u32),
    Clear,
    Render { roots: usize, camera: Vec3 },
    UpdateVisibility { resident: Vec<OctreeHandle>, camera: Vec3 },
    ApplyMaterial(OctreeHandle, PointCloudSettings),
    RuntimeAssetPath(String),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct RecordingRenderer {
    calls: CallLog,
}

impl RenderBackend for RecordingRenderer {
    fn surface(&self) -> SurfaceId {
        SURFACE
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.calls.borrow_mut().push(Call::SetSize(width, height));
    }

    fn clear(&mut self) {
        self.calls.borrow_mut().push(Call::Clear);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &CameraView) {
        self.calls.borrow_mut().push(Call::Render {
            roots: scene.roots().len(),
            camera: camera.position(),
        });
    }
}

#[derive(Debug, Default)]
pub struct HostState {
    next: u64,
    pub live: Vec<(ListenerHandle, HostEventKind)>,
    pub subscribed_total: usize,
    pub requested: Vec<FrameRequest>,
    pub cancelled: Vec<FrameRequest>,
}

#[derive(Clone, Default)]
pub struct CountingHost {
    pub state: Rc<RefCell<HostState>>,
}

impl CountingHost {
    pub fn live_listeners(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn last_requested(&self) -> Option<FrameRequest> {
        self.state.borrow().requested.last().copied()
    }

    pub fn cancelled(&self) -> Vec<FrameRequest> {
        self.state.borrow().cancelled.clone()
    }
}

impl HostWindow for CountingHost {
    fn subscribe(&mut self, kind: HostEventKind) -> ListenerHandle {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let handle = ListenerHandle(state.next);
        state.live.push((handle, kind));
        state.subscribed_total += 1;
        handle
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        self.state.borrow_mut().live.retain(|(h, _)| *h != handle);
    }

    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let request = FrameRequest(state.next);
        state.requested.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.state.borrow_mut().cancelled.push(request);
    }
}

pub struct RecordingMount {
    pub rect: RefCell<Rect>,
    pub surfaces: RefCell<Vec<SurfaceId>>,
}

impl RecordingMount {
    pub fn new(width: f32, height: f32) -> Rc<Self> {
        Rc::new(Self {
            rect: RefCell::new(Rect::new(0.0, 0.0, width, height)),
            surfaces: RefCell::default(),
        })
    }
}

impl MountPoint for RecordingMount {
    fn bounding_rect(&self) -> Rect {
        *self.rect.borrow()
    }

    fn append_surface(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().push(surface);
    }

    fn remove_surface(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().retain(|s| *s != surface);
    }
}

/// A load the test completes by hand.
pub struct ManualRequest<T> {
    pub id: String,
    pub resolved: String,
    sender: Option<oneshot::Sender<Result<T, LoadError>>>,
}

pub struct ManualLoads<T> {
    requests: Rc<RefCell<Vec<ManualRequest<T>>>>,
}

impl<T> Clone for ManualLoads<T> {
    fn clone(&self) -> Self {
        Self {
            requests: self.requests.clone(),
        }
    }
}

impl<T: 'static> ManualLoads<T> {
    fn new() -> Self {
        Self {
            requests: Rc::default(),
        }
    }

    fn start(&self, id: &str, resolved: String) -> LoadFuture<T> {
        let (sender, receiver) = oneshot::channel();
        self.requests.borrow_mut().push(ManualRequest {
            id: id.to_string(),
            resolved,
            sender: Some(sender),
        });
        Box::pin(async move { receiver.await.unwrap_or(Err(LoadError::Cancelled)) })
    }

    /// Complete the `index`-th load started so far.
    pub fn complete(&self, index: usize, result: Result<T, LoadError>) {
        let sender = self.requests.borrow_mut()[index].sender.take();
        if let Some(sender) = sender {
            let _ = sender.send(result);
        }
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn resolved(&self, index: usize) -> String {
        self.requests.borrow()[index].resolved.clone()
    }

    pub fn id(&self, index: usize) -> String {
        self.requests.borrow()[index].id.clone()
    }
}

pub struct ManualPointCloudLoader {
    loads: ManualLoads<OctreeHandle>,
    calls: CallLog,
}

impl PointCloudLoader for ManualPointCloudLoader {
    fn load(&mut self, content_id: &str, resolver: UrlResolver) -> LoadFuture<OctreeHandle> {
        self.loads.start(content_id, resolver.resolve(content_id))
    }

    fn update_visibility(
        &mut self,
        resident: &[OctreeHandle],
        camera: &CameraView,
        _renderer: &dyn RenderBackend,
    ) {
        self.calls.borrow_mut().push(Call::UpdateVisibility {
            resident: resident.to_vec(),
            camera: camera.position(),
        });
    }

    fn apply_material(&mut self, octree: OctreeHandle, settings: &PointCloudSettings) {
        self.calls
            .borrow_mut()
            .push(Call::ApplyMaterial(octree, *settings));
    }
}

pub struct ManualModelLoader {
    loads: ManualLoads<ModelNode>,
    calls: CallLog,
    asset_path: String,
}

impl ModelLoader for ManualModelLoader {
    fn set_runtime_asset_path(&mut self, path: &str) {
        self.asset_path = path.to_string();
        self.calls
            .borrow_mut()
            .push(Call::RuntimeAssetPath(path.to_string()));
    }

    fn load(&mut self, url: &str) -> LoadFuture<ModelNode> {
        self.loads.start(url, format!("{}{}", self.asset_path, url))
    }
}

#[derive(Debug, Default)]
pub struct GizmoLog {
    pub created: usize,
    pub attached: Vec<Entity>,
    pub detached: usize,
    pub modes: Vec<GizmoMode>,
    pub sizes: Vec<f32>,
    pub pointer: Vec<PointerPhase>,
}

/// Starts dragging on any pointer-down with a ray and stops on pointer-up.
pub struct DraggableGizmo {
    log: Rc<RefCell<GizmoLog>>,
    dragging: bool,
    changed: Option<bool>,
}

impl TransformGizmo for DraggableGizmo {
    fn attach(&mut self, target: Entity) {
        self.log.borrow_mut().attached.push(target);
    }

    fn detach(&mut self) {
        self.log.borrow_mut().detached += 1;
    }

    fn set_mode(&mut self, mode: GizmoMode) {
        self.log.borrow_mut().modes.push(mode);
    }

    fn set_size(&mut self, size: f32) {
        self.log.borrow_mut().sizes.push(size);
    }

    fn handle_pointer(&mut self, phase: PointerPhase, ray: Option<Ray3d>) {
        self.log.borrow_mut().pointer.push(phase);
        let dragging = match phase {
            PointerPhase::Down => ray.is_some(),
            PointerPhase::Move => self.dragging,
            PointerPhase::Up => false,
        };
        if dragging != self.dragging {
            self.dragging = dragging;
            self.changed = Some(dragging);
        }
    }

    fn take_dragging_changed(&mut self) -> Option<bool> {
        self.changed.take()
    }
}

pub struct DraggableGizmoFactory {
    log: Rc<RefCell<GizmoLog>>,
}

impl GizmoFactory for DraggableGizmoFactory {
    fn create(&mut self, _camera: &CameraView, surface: SurfaceId) -> Box<dyn TransformGizmo> {
        assert_eq!(surface, SURFACE);
        self.log.borrow_mut().created += 1;
        Box::new(DraggableGizmo {
            log: self.log.clone(),
            dragging: false,
            changed: None,
        })
    }
}

/// A viewer wired to recording doubles.
pub struct Harness {
    pub viewer: Viewer,
    pub calls: CallLog,
    pub host: CountingHost,
    pub mount: Rc<RecordingMount>,
    pub clouds: ManualLoads<OctreeHandle>,
    pub models: ManualLoads<ModelNode>,
    pub gizmos: Rc<RefCell<GizmoLog>>,
    pub settings: SettingsStore,
    clock_ms: f64,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        let calls: CallLog = Rc::default();
        let host = CountingHost::default();
        let clouds = ManualLoads::new();
        let models = ManualLoads::new();
        let gizmos: Rc<RefCell<GizmoLog>> = Rc::default();
        let settings = SettingsStore::default();

        let viewer = Viewer::new(
            config,
            ViewerBackends {
                renderer: Box::new(RecordingRenderer {
                    calls: calls.clone(),
                }),
                host: Box::new(host.clone()),
                point_clouds: Box::new(ManualPointCloudLoader {
                    loads: clouds.clone(),
                    calls: calls.clone(),
                }),
                models: Box::new(ManualModelLoader {
                    loads: models.clone(),
                    calls: calls.clone(),
                    asset_path: String::new(),
                }),
                gizmos: Box::new(DraggableGizmoFactory {
                    log: gizmos.clone(),
                }),
            },
            settings.clone(),
        );

        Self {
            viewer,
            calls,
            host,
            mount: RecordingMount::new(800.0, 600.0),
            clouds,
            models,
            gizmos,
            settings,
            clock_ms: 0.0,
        }
    }

    pub fn initialize(&mut self) {
        let mount: Rc<dyn MountPoint> = self.mount.clone();
        self.viewer.initialize(Some(mount));
    }

    /// Deliver the frame the viewer last asked for, 16ms after the previous.
    pub fn frame(&mut self) {
        self.clock_ms += 16.0;
        if let Some(request) = self.viewer.pending_frame() {
            self.viewer.on_frame(request, self.clock_ms);
        }
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// A mesh model with a 2×2×2 box centred at `centre`.
pub fn box_model(name: &str, centre: Vec3) -> ModelNode {
    ModelNode::mesh(name, MeshBounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0)))
        .with_transform(Transform::from_translation(centre))
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
