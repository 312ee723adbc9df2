use crate::engine::camera::CameraView;
use crate::engine::scene::SceneGraph;
use crate::host::SurfaceId;

/// Rendering backend that draws the scene into a surface.
pub trait RenderBackend {
    /// The surface (canvas) this backend draws into.
    fn surface(&self) -> SurfaceId;

    fn set_size(&mut self, width: u32, height: u32);

    fn clear(&mut self);

    fn render(&mut self, scene: &SceneGraph, camera: &CameraView);
}
