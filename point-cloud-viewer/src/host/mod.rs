//! Boundary to the host environment: window events, frame scheduling and the
//! element the render surface is mounted into.
//!
//! ## Event flow
//!
//! ```text
//! Host window
//!   ├─> HostWindow::subscribe(kind)      (once per kind, at initialize)
//!   │     └─> ListenerHandle kept in ListenerRegistry
//!   ├─> Viewer::dispatch(HostEvent)      (for every raised event)
//!   │     └─> ignored unless its kind is registered
//!   └─> Viewer::on_frame(FrameRequest, t) (for every granted frame)
//!         └─> ignored unless it is the frame the viewer is waiting for
//! ```
//!
//! Subscriptions are released by the handle captured at registration, never
//! by re-deriving the callback.

/// Window input events and their kinds.
pub mod events;

/// Registry of live host subscriptions.
pub mod listeners;

use bevy::prelude::*;

pub use events::{EventTarget, HostEvent, HostEventKind, PointerEvent, WheelEvent};
pub use listeners::ListenerRegistry;

/// Token for one host event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Token for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Identifies a render surface (canvas) inside the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Host window services.
pub trait HostWindow {
    fn subscribe(&mut self, kind: HostEventKind) -> ListenerHandle;

    fn unsubscribe(&mut self, handle: ListenerHandle);

    /// Ask for a single frame callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a frame that has not fired yet. Cancelling twice is harmless.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Element the render surface is attached to.
pub trait MountPoint {
    /// Current client rectangle in window pixels.
    fn bounding_rect(&self) -> Rect;

    fn append_surface(&self, surface: SurfaceId);

    fn remove_surface(&self, surface: SurfaceId);
}
