use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

/// Which element an input event was raised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTarget {
    /// The viewer's render surface.
    #[default]
    Surface,
    /// Anything else in the host window (panels, overlays).
    Elsewhere,
}

/// Pointer state carried by pointer and double-click events. Positions are
/// window client coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub button: MouseButton,
    pub target: EventTarget,
}

impl PointerEvent {
    pub fn new(button: MouseButton, x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            button,
            target: EventTarget::Surface,
        }
    }

    /// A move with no button change, as raised while hovering or dragging.
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(MouseButton::Left, x, y)
    }

    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Vertical scroll amount, negative when scrolling up/away.
    pub delta_y: f32,
    pub target: EventTarget,
}

impl WheelEvent {
    pub fn new(delta_y: f32) -> Self {
        Self {
            delta_y,
            target: EventTarget::Surface,
        }
    }
}

/// Window-level events the viewer subscribes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize,
    Wheel(WheelEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    DoubleClick(PointerEvent),
    KeyDown(KeyCode),
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            Self::Resize => HostEventKind::Resize,
            Self::Wheel(_) => HostEventKind::Wheel,
            Self::PointerDown(_) => HostEventKind::PointerDown,
            Self::PointerMove(_) => HostEventKind::PointerMove,
            Self::PointerUp(_) => HostEventKind::PointerUp,
            Self::DoubleClick(_) => HostEventKind::DoubleClick,
            Self::KeyDown(_) => HostEventKind::KeyDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    Resize,
    Wheel,
    PointerDown,
    PointerMove,
    PointerUp,
    DoubleClick,
    KeyDown,
}

impl HostEventKind {
    /// Everything the viewer listens to while bound.
    pub const VIEWER: [HostEventKind; 7] = [
        HostEventKind::Resize,
        HostEventKind::Wheel,
        HostEventKind::PointerDown,
        HostEventKind::PointerMove,
        HostEventKind::PointerUp,
        HostEventKind::DoubleClick,
        HostEventKind::KeyDown,
    ];
}
