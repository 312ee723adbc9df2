//! Scene camera: perspective lens, per-frame camera view and the orbit
//! controls that drive its pose.
//!
//! The controls hold spherical state (distance, azimuth, elevation, target)
//! and translate pointer and wheel input into changes of that state. Once per
//! frame the viewer asks them to write the resulting pose into the camera
//! transform.

/// Perspective lens, camera view snapshot and screen-to-ray conversion.
pub mod lens;

/// Spherical orbit camera model and its pointer/wheel input state machine.
pub mod orbit_controls;

pub use lens::{CameraView, PerspectiveLens, pointer_to_ndc};
pub use orbit_controls::{CameraControls, OrbitInputState, SphericalCamera};
