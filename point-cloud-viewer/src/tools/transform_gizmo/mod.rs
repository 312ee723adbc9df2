//! Double-click picking and transform gizmo management.
//!
//! ## Pick flow
//!
//! ```text
//! DoubleClick(pointer)
//!   └─> pointer_to_ndc(mount rect) ─> CameraView::ray_from_ndc
//!       └─> GizmoSession::pick
//!           ├─> first top-level Mesh whose subtree the ray hits
//!           │     ├─> GizmoFactory::create(camera, surface)
//!           │     ├─> TransformGizmo::attach(target)
//!           │     └─> NodeKind::Gizmo node added to the scene
//!           └─> no hit: detach and drop every active gizmo
//! ```
//!
//! While any gizmo reports an active drag the orbit controls are disabled;
//! they are re-enabled when the last drag ends or the gizmo is released.
//! Key-down events switch every active gizmo between translate (`G`),
//! rotate (`R`) and scale (`S`).

/// OBB ray tests over scene subtrees.
pub mod ray;

/// Picked objects mapped to their gizmos.
pub mod session;

/// Gizmo mode and slot policy.
pub mod state;

/// Widget traits implemented by gizmo backends.
pub mod widget;

pub use ray::{Intersection, intersect_node};
pub use session::{GizmoAnchor, GizmoSession, PickOutcome};
pub use state::{GizmoMode, GizmoPolicy};
pub use widget::{GizmoFactory, PointerPhase, TransformGizmo};
