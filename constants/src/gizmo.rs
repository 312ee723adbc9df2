use bevy::input::keyboard::KeyCode;

/// Screen-space size the transform gizmo is held at, before the field of view
/// correction.
pub const APPARENT_SIZE: f32 = 20.0;

/// Upper bound of the field of view correction applied to the gizmo size.
pub const MAX_FOV_FACTOR: f32 = 7.0;

/// Scale applied to `tan(fov / 2)` when sizing the gizmo.
pub const FOV_FACTOR_SCALE: f32 = 1.9;

pub const TRANSLATE_KEY: KeyCode = KeyCode::KeyG;
pub const ROTATE_KEY: KeyCode = KeyCode::KeyR;
pub const SCALE_KEY: KeyCode = KeyCode::KeyS;
