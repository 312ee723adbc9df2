/// Point clouds are authored Z-up; the scene is Y-up. Loaded clouds are
/// rotated -90° about X (Z→Y, -Y→Z, X→X).
pub const Z_UP_TO_Y_UP_RADIANS: f32 = -std::f32::consts::FRAC_PI_2;

/// Offset along X applied to the demo cloud after loading.
pub const DEMO_CLOUD_OFFSET_X: f32 = -1.0;

/// Row-major equivalent of `Z_UP_TO_Y_UP_RADIANS`: [x_new, y_new, z_new].
pub const COORDINATE_TRANSFORM: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0],  // X = X
    [0.0, 0.0, 1.0],  // Y = Z
    [0.0, -1.0, 0.0], // Z = -Y
];

/// Apply the Z-up to Y-up transformation to a single coordinate.
pub fn transform_coordinates(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += COORDINATE_TRANSFORM[i][j] * input[j];
        }
    }

    (output[0], output[1], output[2])
}
