/// Auxiliary runtime assets for the model loader (parser binaries, schemas).
pub const RUNTIME_ASSET_PATH: &str = "./assets/";

/// Demo point cloud shipped with the viewer.
pub const DEMO_POINT_CLOUD_BASE: &str = "./assets/pointclouds/demo/";
pub const DEMO_POINT_CLOUD_FILE: &str = "cloud.js";
