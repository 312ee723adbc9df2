use bevy::prelude::*;
use constants::gizmo::FOV_FACTOR_SCALE;

use super::ray::intersect_node;
use super::state::{GizmoMode, GizmoPolicy};
use super::widget::{GizmoFactory, PointerPhase, TransformGizmo};
use crate::config::GizmoConfig;
use crate::engine::camera::{CameraControls, CameraView};
use crate::engine::scene::{NodeKind, SceneGraph};
use crate::host::SurfaceId;

/// Links a gizmo scene node to the node it manipulates.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GizmoAnchor {
    pub target: Entity,
}

/// Result of a double-click pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// A new gizmo was attached to this node.
    Attached(Entity),
    /// The node already carries a gizmo; it was kept.
    AlreadyActive(Entity),
    /// Nothing pickable under the pointer. All gizmos were released.
    Missed,
}

struct ActiveGizmo {
    target: Entity,
    node: Entity,
    widget: Box<dyn TransformGizmo>,
    dragging: bool,
}

/// Picked objects and the gizmos attached to them.
pub struct GizmoSession {
    policy: GizmoPolicy,
    active: Vec<ActiveGizmo>,
    /// Whether the controls were last disabled because of a drag.
    controls_suspended: bool,
}

impl GizmoSession {
    pub fn new(policy: GizmoPolicy) -> Self {
        Self {
            policy,
            active: Vec::new(),
            controls_suspended: false,
        }
    }

    /// Cast `ray` against the top-level nodes in scene order. The first mesh
    /// node with any hit in its subtree gets a gizmo; there is no closest-hit
    /// sort across top-level nodes.
    pub fn pick(
        &mut self,
        scene: &mut SceneGraph,
        ray: Option<Ray3d>,
        camera: &CameraView,
        factory: &mut dyn GizmoFactory,
        surface: SurfaceId,
        controls: &mut CameraControls,
    ) -> PickOutcome {
        let hit = ray.and_then(|ray| {
            scene.roots().iter().copied().find(|&root| {
                scene.node_kind(root) == Some(NodeKind::Mesh)
                    && !intersect_node(scene, root, &ray).is_empty()
            })
        });

        let Some(target) = hit else {
            let released = self.release_all(scene, controls);
            debug!("pick missed, released {} gizmo(s)", released);
            return PickOutcome::Missed;
        };

        if self.active.iter().any(|g| g.target == target) {
            return PickOutcome::AlreadyActive(target);
        }
        if self.policy == GizmoPolicy::Single {
            self.release_all(scene, controls);
        }

        let mut widget = factory.create(camera, surface);
        widget.attach(target);
        let position = scene.world_translation(target).unwrap_or_default();
        let node = scene.add(
            NodeKind::Gizmo,
            Transform::from_translation(position),
            (GizmoAnchor { target }, Name::new("transform_gizmo")),
        );
        info!("attached transform gizmo to {:?}", target);

        self.active.push(ActiveGizmo {
            target,
            node,
            widget,
            dragging: false,
        });
        PickOutcome::Attached(target)
    }

    /// Apply `mode` to every active gizmo. Returns how many were changed.
    pub fn set_mode_all(&mut self, mode: GizmoMode) -> usize {
        for gizmo in &mut self.active {
            gizmo.widget.set_mode(mode);
        }
        if !self.active.is_empty() {
            debug!("gizmo mode set to {:?}", mode);
        }
        self.active.len()
    }

    /// Feed a pointer event to every active gizmo, then reflect their drag
    /// state on the camera controls.
    pub fn forward_pointer(
        &mut self,
        phase: PointerPhase,
        ray: Option<Ray3d>,
        controls: &mut CameraControls,
    ) {
        for gizmo in &mut self.active {
            gizmo.widget.handle_pointer(phase, ray);
        }
        self.sync_drag(controls);
    }

    /// Orbiting is suspended while any gizmo drags and resumed after. The
    /// controls are only touched when that state flips.
    pub fn sync_drag(&mut self, controls: &mut CameraControls) {
        for gizmo in &mut self.active {
            if let Some(dragging) = gizmo.widget.take_dragging_changed() {
                gizmo.dragging = dragging;
            }
        }
        let dragging = self.is_dragging();
        if dragging != self.controls_suspended {
            self.controls_suspended = dragging;
            controls.set_enabled(!dragging);
            trace!("camera controls enabled: {}", !dragging);
        }
    }

    /// Keep every gizmo at its target and at a constant apparent size.
    pub fn rescale(&mut self, scene: &mut SceneGraph, camera: &CameraView, config: &GizmoConfig) {
        let factor = camera.fov_size_factor(FOV_FACTOR_SCALE, config.max_fov_factor);
        for gizmo in &mut self.active {
            let Some(position) = scene.world_translation(gizmo.target) else {
                continue;
            };
            if let Some(mut transform) = scene.transform_mut(gizmo.node) {
                transform.translation = position;
            }
            let distance = camera.position().distance(position);
            if distance > f32::EPSILON {
                gizmo.widget.set_size(config.apparent_size / distance * factor);
            }
        }
    }

    /// Detach every gizmo and remove it from the scene. Returns how many were
    /// released.
    pub fn release_all(&mut self, scene: &mut SceneGraph, controls: &mut CameraControls) -> usize {
        let released = self.active.len();
        for mut gizmo in self.active.drain(..) {
            gizmo.widget.detach();
            scene.remove(gizmo.node);
            info!("detached transform gizmo from {:?}", gizmo.target);
        }
        if self.controls_suspended {
            self.controls_suspended = false;
            controls.set_enabled(true);
        }
        released
    }

    pub fn active_targets(&self) -> Vec<Entity> {
        self.active.iter().map(|g| g.target).collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.iter().any(|g| g.dragging)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn policy(&self) -> GizmoPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config::{LensConfig, OrbitConfig};
    use crate::engine::camera::PerspectiveLens;
    use crate::engine::scene::MeshBounds;

    #[derive(Default)]
    struct Log {
        attached: Vec<Entity>,
        detached: usize,
        modes: Vec<GizmoMode>,
        sizes: Vec<f32>,
    }

    struct StubGizmo {
        log: Rc<RefCell<Log>>,
        pending_drag: Option<bool>,
    }

    impl TransformGizmo for StubGizmo {
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
        fn handle_pointer(&mut self, phase: PointerPhase, _ray: Option<Ray3d>) {
            match phase {
                PointerPhase::Down => self.pending_drag = Some(true),
                PointerPhase::Up => self.pending_drag = Some(false),
                PointerPhase::Move => {}
            }
        }
        fn take_dragging_changed(&mut self) -> Option<bool> {
            self.pending_drag.take()
        }
    }

    #[derive(Default)]
    struct StubFactory {
        log: Rc<RefCell<Log>>,
    }

    impl GizmoFactory for StubFactory {
        fn create(&mut self, _camera: &CameraView, _surface: SurfaceId) -> Box<dyn TransformGizmo> {
            Box::new(StubGizmo {
                log: self.log.clone(),
                pending_drag: None,
            })
        }
    }

    fn camera() -> CameraView {
        CameraView {
            transform: Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
            lens: PerspectiveLens::from_config(&LensConfig::default(), 1.0),
        }
    }

    fn centre_ray() -> Option<Ray3d> {
        camera().ray_from_ndc(Vec2::ZERO)
    }

    fn unit_box() -> MeshBounds {
        MeshBounds::new(-Vec3::ONE, Vec3::ONE)
    }

    struct Fixture {
        scene: SceneGraph,
        session: GizmoSession,
        factory: StubFactory,
        controls: CameraControls,
    }

    impl Fixture {
        fn new(policy: GizmoPolicy) -> Self {
            Self {
                scene: SceneGraph::new(),
                session: GizmoSession::new(policy),
                factory: StubFactory::default(),
                controls: CameraControls::new(&OrbitConfig::default()),
            }
        }

        fn pick(&mut self, ray: Option<Ray3d>) -> PickOutcome {
            self.session.pick(
                &mut self.scene,
                ray,
                &camera(),
                &mut self.factory,
                SurfaceId(1),
                &mut self.controls,
            )
        }
    }

    #[test]
    fn first_mesh_in_scene_order_wins() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        // Points node in front of everything is never picked.
        fx.scene.add(NodeKind::Points, Transform::from_xyz(0.0, 0.0, 5.0), unit_box());
        let far = fx.scene.add(NodeKind::Mesh, Transform::from_xyz(0.0, 0.0, -5.0), unit_box());
        let near = fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());

        assert_eq!(fx.pick(centre_ray()), PickOutcome::Attached(far));
        assert_eq!(fx.session.active_targets(), vec![far]);
        assert_eq!(fx.factory.log.borrow().attached, vec![far]);
        assert_ne!(far, near);
        assert_eq!(fx.scene.count_kind(NodeKind::Gizmo), 1);
    }

    #[test]
    fn miss_releases_every_gizmo() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        fx.pick(centre_ray());

        let off_to_the_side = camera().ray_from_ndc(Vec2::new(0.95, 0.95));
        assert_eq!(fx.pick(off_to_the_side), PickOutcome::Missed);
        assert!(fx.session.is_empty());
        assert_eq!(fx.scene.count_kind(NodeKind::Gizmo), 0);
        assert_eq!(fx.factory.log.borrow().detached, 1);
    }

    #[test]
    fn single_policy_moves_the_gizmo() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        let a = fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        let b = fx.scene.add(NodeKind::Mesh, Transform::from_xyz(5.0, 0.0, 0.0), unit_box());

        assert_eq!(fx.pick(centre_ray()), PickOutcome::Attached(a));
        let towards_b = Ray3d {
            origin: Vec3::new(5.0, 0.0, 10.0),
            direction: Dir3::NEG_Z,
        };
        assert_eq!(fx.pick(Some(towards_b)), PickOutcome::Attached(b));
        assert_eq!(fx.session.active_targets(), vec![b]);
        assert_eq!(fx.scene.count_kind(NodeKind::Gizmo), 1);
    }

    #[test]
    fn multi_policy_keeps_earlier_gizmos() {
        let mut fx = Fixture::new(GizmoPolicy::Multi);
        let a = fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        let b = fx.scene.add(NodeKind::Mesh, Transform::from_xyz(5.0, 0.0, 0.0), unit_box());

        fx.pick(centre_ray());
        let towards_b = Ray3d {
            origin: Vec3::new(5.0, 0.0, 10.0),
            direction: Dir3::NEG_Z,
        };
        fx.pick(Some(towards_b));
        assert_eq!(fx.pick(centre_ray()), PickOutcome::AlreadyActive(a));
        assert_eq!(fx.session.active_targets(), vec![a, b]);
        assert_eq!(fx.session.set_mode_all(GizmoMode::Rotate), 2);
        assert_eq!(fx.factory.log.borrow().modes, vec![GizmoMode::Rotate; 2]);
    }

    #[test]
    fn drag_suspends_orbiting_until_release() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        fx.pick(centre_ray());

        fx.session.forward_pointer(PointerPhase::Down, centre_ray(), &mut fx.controls);
        assert!(fx.session.is_dragging());
        assert!(!fx.controls.enabled());

        fx.session.forward_pointer(PointerPhase::Move, centre_ray(), &mut fx.controls);
        assert!(!fx.controls.enabled());

        fx.session.forward_pointer(PointerPhase::Up, centre_ray(), &mut fx.controls);
        assert!(fx.controls.enabled());
    }

    #[test]
    fn releasing_mid_drag_restores_controls() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        fx.pick(centre_ray());
        fx.session.forward_pointer(PointerPhase::Down, centre_ray(), &mut fx.controls);

        fx.session.release_all(&mut fx.scene, &mut fx.controls);
        assert!(fx.controls.enabled());
    }

    #[test]
    fn rescale_follows_camera_distance() {
        let mut fx = Fixture::new(GizmoPolicy::Single);
        fx.scene.add(NodeKind::Mesh, Transform::default(), unit_box());
        fx.pick(centre_ray());

        let config = GizmoConfig::default();
        fx.session.rescale(&mut fx.scene, &camera(), &config);

        let lens = LensConfig::default();
        let factor = (FOV_FACTOR_SCALE * (lens.fov_degrees.to_radians() * 0.5).tan() / lens.zoom)
            .min(config.max_fov_factor);
        let expected = config.apparent_size / 10.0 * factor;
        let log = fx.factory.log.borrow();
        assert!((log.sizes[0] - expected).abs() < 1e-4);
    }
}
