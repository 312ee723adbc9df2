use std::rc::Rc;

use bevy::prelude::*;

use super::binding::ViewportBinding;
use super::frame_loop::FrameLoop;
use crate::config::ViewerConfig;
use crate::engine::camera::{CameraControls, CameraView, PerspectiveLens, pointer_to_ndc};
use crate::engine::loading::{
    LoadQueue, ModelContentSet, ModelLoader, PendingPointCloud, PointCloudLoader,
    ResidentPointCloud, ResidentSlot, UrlResolver,
};
use crate::engine::render::RenderBackend;
use crate::engine::scene::{InstalledLights, SceneGraph};
use crate::host::{
    EventTarget, FrameRequest, HostEvent, HostEventKind, HostWindow, ListenerRegistry,
    MountPoint, PointerEvent,
};
use crate::settings::SettingsStore;
use crate::tools::transform_gizmo::{
    GizmoFactory, GizmoMode, GizmoSession, PickOutcome, PointerPhase,
};

/// External collaborators the viewer drives.
pub struct ViewerBackends {
    pub renderer: Box<dyn RenderBackend>,
    pub host: Box<dyn HostWindow>,
    pub point_clouds: Box<dyn PointCloudLoader>,
    pub models: Box<dyn ModelLoader>,
    pub gizmos: Box<dyn GizmoFactory>,
}

/// Composes the streaming point cloud renderer and the model loader into one
/// scene with orbit navigation and click-to-manipulate gizmos.
///
/// The viewer is single-threaded. Host events arrive through
/// [`dispatch`](Self::dispatch), frames through [`on_frame`](Self::on_frame),
/// and load results are applied at the start of each frame or on an explicit
/// [`poll_loads`](Self::poll_loads).
pub struct Viewer {
    config: ViewerConfig,
    renderer: Box<dyn RenderBackend>,
    host: Box<dyn HostWindow>,
    point_clouds: Box<dyn PointCloudLoader>,
    models_loader: Box<dyn ModelLoader>,
    gizmo_factory: Box<dyn GizmoFactory>,
    settings: SettingsStore,

    scene: SceneGraph,
    camera: CameraView,
    controls: CameraControls,
    gizmos: GizmoSession,
    resident: ResidentSlot,
    models: ModelContentSet,
    loads: LoadQueue,
    frames: FrameLoop,
    binding: Option<ViewportBinding>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, backends: ViewerBackends, settings: SettingsStore) -> Self {
        let ViewerBackends {
            renderer,
            host,
            point_clouds,
            mut models,
            gizmos,
        } = backends;
        models.set_runtime_asset_path(&config.runtime_asset_path);

        let controls = CameraControls::new(&config.orbit);
        let mut camera = CameraView {
            transform: Transform::default(),
            lens: PerspectiveLens::from_config(&config.camera, 1.0),
        };
        controls.update(&mut camera.transform);

        Self {
            gizmos: GizmoSession::new(config.gizmo.policy),
            renderer,
            host,
            point_clouds,
            models_loader: models,
            gizmo_factory: gizmos,
            settings,
            scene: SceneGraph::new(),
            camera,
            controls,
            resident: ResidentSlot::default(),
            models: ModelContentSet::default(),
            loads: LoadQueue::default(),
            frames: FrameLoop::default(),
            binding: None,
            config,
        }
    }

    /// Bind to `mount`. Does nothing if already bound or if there is no
    /// mount point.
    pub fn initialize(&mut self, mount: Option<Rc<dyn MountPoint>>) {
        if self.binding.is_some() {
            debug!("initialize ignored: viewer is already bound");
            return;
        }
        let Some(mount) = mount else {
            debug!("initialize ignored: no mount point");
            return;
        };

        mount.append_surface(self.renderer.surface());
        let lights = InstalledLights::spawn(&mut self.scene, &self.config.lights);
        let settings = self.settings.subscribe();
        let mut listeners = ListenerRegistry::default();
        listeners.register_all(self.host.as_mut(), &HostEventKind::VIEWER);

        self.binding = Some(ViewportBinding {
            mount,
            size: Vec2::ZERO,
            listeners,
            settings,
            lights,
        });
        self.resize();
        let request = self.frames.schedule(self.host.as_mut());
        info!(
            "viewer initialized on surface {:?}, first frame {:?}",
            self.renderer.surface(),
            request
        );
    }

    /// Unbind: detach the surface, release every subscription, clear the
    /// resident point cloud and cancel the pending frame. The viewer can be
    /// initialized again afterwards.
    pub fn destroy(&mut self) {
        let Some(mut binding) = self.binding.take() else {
            debug!("destroy ignored: viewer is not bound");
            return;
        };

        binding.mount.remove_surface(self.renderer.surface());
        let released = binding.listeners.release_all(self.host.as_mut());
        self.settings.unsubscribe(binding.settings);
        binding.lights.despawn(&mut self.scene);

        self.gizmos.release_all(&mut self.scene, &mut self.controls);
        self.controls.on_pointer_up();
        self.resident.clear(&mut self.scene);
        let cancelled = self.loads.cancel_all();
        self.frames.cancel(self.host.as_mut());

        info!(
            "viewer destroyed: {} listener(s) released, {} load(s) cancelled",
            released, cancelled
        );
    }

    /// Load a streaming point cloud. Relative paths inside the content are
    /// resolved against `base_location`.
    ///
    /// On success the previous resident cloud is replaced. The returned
    /// future resolves once the result has been applied; if it is dropped,
    /// failures are logged instead.
    pub fn load(&mut self, content_id: &str, base_location: &str) -> PendingPointCloud {
        debug!("loading point cloud {} from {}", content_id, base_location);
        let future = self
            .point_clouds
            .load(content_id, UrlResolver::new(base_location));
        self.loads.push_point_cloud(content_id, future)
    }

    /// Load a model and add it to the scene when it arrives. Failures are
    /// logged.
    pub fn load_model(&mut self, url: &str) {
        debug!("loading model {}", url);
        let future = self.models_loader.load(url);
        self.loads.push_model(url, future);
    }

    /// Apply every load that has completed. Returns how many were handled.
    pub fn poll_loads(&mut self) -> usize {
        let mut handled = 0;

        for completed in self.loads.take_ready_point_clouds() {
            handled += 1;
            let outcome = completed.result.map(|octree| {
                let resident = self
                    .resident
                    .replace(&mut self.scene, octree, &completed.content_id);
                self.point_clouds.apply_material(octree, &self.settings.get());
                info!(
                    "point cloud {} resident as {:?}",
                    completed.content_id, resident.entity
                );
                resident
            });
            if let Err(Err(err)) = completed.responder.send(outcome) {
                error!("point cloud {} failed to load: {}", completed.content_id, err);
            }
        }

        for completed in self.loads.take_ready_models() {
            handled += 1;
            match completed.result {
                Ok(model) => {
                    let root = self.models.insert(&mut self.scene, &completed.url, &model);
                    info!("model {} added as {:?}", completed.url, root);
                }
                Err(err) => error!("model {} failed to load: {}", completed.url, err),
            }
        }

        handled
    }

    /// Move the camera from the controls, then refresh the level of detail
    /// of the resident cloud for the new camera. `dt_secs` is the time since
    /// the previous frame in seconds.
    pub fn update(&mut self, _dt_secs: f32) {
        self.controls.update(&mut self.camera.transform);
        self.point_clouds.update_visibility(
            &self.resident.handles(),
            &self.camera,
            self.renderer.as_ref(),
        );
    }

    pub fn render(&mut self) {
        self.renderer.clear();
        self.renderer.render(&self.scene, &self.camera);
    }

    /// Size the camera aspect and the render surface from the mount's
    /// bounding rectangle. Degenerate rectangles are skipped.
    pub fn resize(&mut self) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let size = binding.bounding_rect().size();
        if !self.camera.lens.set_viewport(size.x, size.y) {
            debug!("resize skipped: mount is {}x{}", size.x, size.y);
            return;
        }
        self.renderer.set_size(size.x as u32, size.y as u32);
        binding.size = size;
        trace!("resized to {}x{}", size.x, size.y);
    }

    /// Route a host window event. Events of kinds the viewer has not
    /// subscribed to are ignored.
    pub fn dispatch(&mut self, event: HostEvent) {
        let subscribed = self
            .binding
            .as_ref()
            .is_some_and(|b| b.listeners.is_registered(event.kind()));
        if !subscribed {
            trace!("ignoring {:?}: not subscribed", event.kind());
            return;
        }

        match event {
            HostEvent::Resize => self.resize(),
            HostEvent::Wheel(wheel) => {
                if wheel.target == EventTarget::Surface {
                    self.controls.handle_wheel(wheel.delta_y);
                }
            }
            HostEvent::PointerDown(pointer) => {
                if pointer.target == EventTarget::Surface {
                    self.forward_to_gizmos(PointerPhase::Down, &pointer);
                    self.controls.on_pointer_down(&pointer);
                }
            }
            HostEvent::PointerMove(pointer) => {
                if pointer.target == EventTarget::Surface {
                    self.forward_to_gizmos(PointerPhase::Move, &pointer);
                    self.controls.on_pointer_move(&pointer);
                }
            }
            // A release anywhere ends the drag.
            HostEvent::PointerUp(pointer) => {
                self.forward_to_gizmos(PointerPhase::Up, &pointer);
                self.controls.on_pointer_up();
            }
            HostEvent::DoubleClick(pointer) => {
                self.pick(&pointer);
            }
            HostEvent::KeyDown(key) => {
                if let Some(mode) = GizmoMode::from_key(key) {
                    self.gizmos.set_mode_all(mode);
                }
            }
        }
    }

    /// Host frame callback. Frames other than the one requested last are
    /// ignored. The first accepted frame only records its timestamp.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        if self.binding.is_none() || !self.frames.accept(request) {
            trace!("ignoring stale frame {:?}", request);
            return;
        }
        self.frames.schedule(self.host.as_mut());

        self.poll_loads();
        self.apply_settings_change();

        let Some(dt_secs) = self.frames.advance(timestamp_ms) else {
            return;
        };
        self.gizmos
            .rescale(&mut self.scene, &self.camera, &self.config.gizmo);
        self.update(dt_secs);
        self.render();
    }

    /// Mutable access to a node's local transform, e.g. to place a freshly
    /// loaded cloud.
    pub fn transform_mut(&mut self, entity: Entity) -> Option<Mut<'_, Transform>> {
        self.scene.transform_mut(entity)
    }

    fn apply_settings_change(&mut self) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let Some(settings) = self.settings.take_change(binding.settings) else {
            return;
        };
        for octree in self.resident.handles() {
            self.point_clouds.apply_material(octree, &settings);
        }
        debug!("point cloud material updated: {:?}", settings);
    }

    fn pointer_ray(&self, pointer: &PointerEvent) -> Option<Ray3d> {
        let rect = self.binding.as_ref()?.bounding_rect();
        let ndc = pointer_to_ndc(pointer.position, rect)?;
        self.camera.ray_from_ndc(ndc)
    }

    fn forward_to_gizmos(&mut self, phase: PointerPhase, pointer: &PointerEvent) {
        if self.gizmos.is_empty() {
            return;
        }
        let ray = self.pointer_ray(pointer);
        self.gizmos.forward_pointer(phase, ray, &mut self.controls);
    }

    fn pick(&mut self, pointer: &PointerEvent) -> PickOutcome {
        let ray = self.pointer_ray(pointer);
        let surface = self.renderer.surface();
        self.gizmos.pick(
            &mut self.scene,
            ray,
            &self.camera,
            self.gizmo_factory.as_mut(),
            surface,
            &mut self.controls,
        )
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn camera(&self) -> &CameraView {
        &self.camera
    }

    pub fn controls(&self) -> &CameraControls {
        &self.controls
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn resident_point_cloud(&self) -> Option<ResidentPointCloud> {
        self.resident.current()
    }

    pub fn models(&self) -> &[Entity] {
        self.models.roots()
    }

    pub fn active_gizmo_targets(&self) -> Vec<Entity> {
        self.gizmos.active_targets()
    }

    /// Surface size applied by the last successful resize.
    pub fn surface_size(&self) -> Option<Vec2> {
        self.binding.as_ref().map(|b| b.size)
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.frames.pending()
    }

    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }
}
