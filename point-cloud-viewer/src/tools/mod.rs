//! Interactive tools operating on the viewer scene.
//!
//! ## Transform Gizmo (`transform_gizmo`)
//! - **Activation**: double-click on a mesh in the render surface
//! - **Purpose**: attach a translate/rotate/scale handle to the picked object
//! - **Workflow**:
//!   1. Double-click casts a ray from the camera through the pointer
//!   2. The first top-level mesh the ray hits receives a gizmo
//!   3. `G`, `R` and `S` switch the mode of every active gizmo
//!   4. Dragging a handle suspends orbiting until the drag ends
//!   5. Double-clicking empty space releases all gizmos

/// Double-click picking and transform gizmo session.
pub mod transform_gizmo;
