/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 50.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;
pub const ZOOM: f32 = 1.0;

/// Pointer pixels to turns of rotation.
pub const ROTATION_SPEED: f32 = 0.001;

/// Wheel delta units to relative distance change. A standard 100 unit wheel
/// notch scales the distance by 1.25.
pub const ZOOM_SPEED: f32 = 0.0025;

pub const INITIAL_DISTANCE: f32 = 10.0;
pub const INITIAL_AZIMUTH: f32 = 0.0;
/// Starting elevation in radians, 45° above the target.
pub const INITIAL_ELEVATION: f32 = std::f32::consts::FRAC_PI_4;

pub const MIN_DISTANCE: f32 = 0.05;
pub const MAX_DISTANCE: f32 = 5000.0;
