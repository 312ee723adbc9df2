//! Viewer lifecycle: binding to a mount point, the self-rescheduling frame
//! loop and the orchestrator that ties camera, content and gizmos together.
//!
//! ## Tick order
//!
//! ```text
//! Viewer::on_frame(request, t)
//!   ├─> reject unless `request` is the pending frame
//!   ├─> schedule the next frame
//!   ├─> apply completed loads and settings changes
//!   └─> from the second frame on:
//!       ├─> rescale active gizmos
//!       ├─> update: camera pose, then visibility refresh
//!       └─> render: clear, then draw
//! ```

/// Resources held while the viewer is bound to a mount point.
pub mod binding;

/// Frame token and timestamp bookkeeping for the render loop.
pub mod frame_loop;

/// The viewer orchestrator.
pub mod viewer;

pub use binding::ViewportBinding;
pub use frame_loop::FrameLoop;
pub use viewer::{Viewer, ViewerBackends};
