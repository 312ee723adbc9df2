use std::cell::RefCell;
use std::rc::Rc;

use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use constants::path::{DEMO_POINT_CLOUD_BASE, DEMO_POINT_CLOUD_FILE};
use futures::FutureExt;

use point_cloud_viewer::engine::loading::{PendingPointCloud, ResidentPointCloud};
use point_cloud_viewer::headless::{
    CloudJsLoader, HeadlessHost, HeadlessMount, HeadlessRenderer, JsonModelLoader,
    NullGizmoFactory, RenderStats,
};
use point_cloud_viewer::host::{HostEvent, MountPoint, PointerEvent, SurfaceId, WheelEvent};
use point_cloud_viewer::{SettingsStore, Viewer, ViewerBackends, ViewerConfig};

const DEMO_MODEL: &str = "models/pavilion.json";
const MOUNT_WIDTH: f32 = 800.0;
const MOUNT_HEIGHT: f32 = 600.0;
/// Frames rendered between the last scripted input and teardown.
const SETTLE_FRAMES: usize = 4;

/// Scripted interaction replayed against a headless viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoStep {
    Initialize,
    AwaitPointCloud,
    Orbit,
    Zoom,
    Pick,
    RotateMode,
    Settle(usize),
    Teardown,
}

struct ViewerDemo {
    viewer: Viewer,
    host: HeadlessHost,
    mount: Rc<HeadlessMount>,
    settings: SettingsStore,
    stats: Rc<RefCell<RenderStats>>,
    step: DemoStep,
    pending: Option<PendingPointCloud>,
}

impl ViewerDemo {
    fn new(config: ViewerConfig) -> Self {
        let host = HeadlessHost::new();
        let renderer = HeadlessRenderer::new(SurfaceId(1));
        let stats = renderer.stats();
        let settings = SettingsStore::default();

        let viewer = Viewer::new(
            config,
            ViewerBackends {
                renderer: Box::new(renderer),
                host: Box::new(host.clone()),
                point_clouds: Box::new(CloudJsLoader::new()),
                models: Box::new(JsonModelLoader::new()),
                gizmos: Box::new(NullGizmoFactory::default()),
            },
            settings.clone(),
        );

        Self {
            viewer,
            host,
            mount: Rc::new(HeadlessMount::new(MOUNT_WIDTH, MOUNT_HEIGHT)),
            settings,
            stats,
            step: DemoStep::Initialize,
            pending: None,
        }
    }

    fn centre(&self) -> (f32, f32) {
        (MOUNT_WIDTH * 0.5, MOUNT_HEIGHT * 0.5)
    }

    /// Run one step of the script. Returns `true` once the script is done.
    fn advance(&mut self) -> bool {
        self.step = match self.step {
            DemoStep::Initialize => {
                let mount: Rc<dyn MountPoint> = self.mount.clone();
                self.viewer.initialize(Some(mount));
                self.pending = Some(
                    self.viewer
                        .load(DEMO_POINT_CLOUD_FILE, DEMO_POINT_CLOUD_BASE),
                );
                self.viewer.load_model(DEMO_MODEL);
                DemoStep::AwaitPointCloud
            }
            DemoStep::AwaitPointCloud => {
                let Some(result) = self.pending.as_mut().and_then(|p| p.now_or_never()) else {
                    return false;
                };
                self.pending = None;
                match result {
                    Ok(resident) => {
                        if let Some(mut transform) = self.viewer.transform_mut(resident.entity) {
                            ResidentPointCloud::apply_demo_placement(&mut transform);
                        }
                        info!("demo cloud placed: {:?}", resident.octree);
                    }
                    Err(err) => warn!("demo cloud unavailable: {}", err),
                }
                DemoStep::Orbit
            }
            DemoStep::Orbit => {
                let (x, y) = self.centre();
                self.viewer
                    .dispatch(HostEvent::PointerDown(PointerEvent::new(MouseButton::Left, x, y)));
                self.viewer
                    .dispatch(HostEvent::PointerMove(PointerEvent::moved(x + 40.0, y - 15.0)));
                self.viewer
                    .dispatch(HostEvent::PointerUp(PointerEvent::moved(x + 40.0, y - 15.0)));
                DemoStep::Zoom
            }
            DemoStep::Zoom => {
                self.viewer.dispatch(HostEvent::Wheel(WheelEvent::new(-120.0)));
                self.settings.update(|s| s.size = 2.0);
                DemoStep::Pick
            }
            DemoStep::Pick => {
                let (x, y) = self.centre();
                self.viewer
                    .dispatch(HostEvent::DoubleClick(PointerEvent::new(MouseButton::Left, x, y)));
                info!("gizmos attached to {:?}", self.viewer.active_gizmo_targets());
                DemoStep::RotateMode
            }
            DemoStep::RotateMode => {
                self.viewer.dispatch(HostEvent::KeyDown(KeyCode::KeyR));
                DemoStep::Settle(0)
            }
            DemoStep::Settle(n) if n + 1 < SETTLE_FRAMES => DemoStep::Settle(n + 1),
            DemoStep::Settle(_) => DemoStep::Teardown,
            DemoStep::Teardown => {
                let spherical = *self.viewer.controls().spherical();
                self.viewer.destroy();
                let stats = *self.stats.borrow();
                info!(
                    "demo finished: {} frame(s) at {:?}, camera distance {:.2}, {} model(s), {} listener(s) left",
                    stats.frames,
                    stats.size,
                    spherical.distance,
                    self.viewer.models().len(),
                    self.host.listener_count()
                );
                return true;
            }
        };
        false
    }
}

fn drive_viewer(
    mut demo: NonSendMut<ViewerDemo>,
    time: Res<Time>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(request) = demo.host.take_frame() {
        let timestamp_ms = time.elapsed_secs_f64() * 1000.0;
        demo.viewer.on_frame(request, timestamp_ms);
    }
    if demo.advance() {
        exit.write(AppExit::Success);
    }
}

fn load_config() -> ViewerConfig {
    let Some(path) = std::env::args().nth(1) else {
        return ViewerConfig::default();
    };
    match ViewerConfig::from_path(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!("could not read {}: {}, using defaults", path, err);
            ViewerConfig::default()
        }
    }
}

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    let config = load_config();
    app.insert_non_send_resource(ViewerDemo::new(config))
        .add_systems(Update, drive_viewer);

    app.run();
}
