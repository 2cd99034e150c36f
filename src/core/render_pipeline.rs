use super::display_context::Viewport;
use super::frame::{DrawCall, Frame};
use crate::camera::CameraState;
use crate::scene::{Scene, SceneBuffer};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Graphics backend the viewer draws through
pub trait RenderPipeline {
    /// Backend handle for uploaded geometry
    type Buffer;

    /// Copy the scene's vertices to backend storage
    fn upload(&mut self, scene: &Scene) -> Self::Buffer;

    /// Execute one frame: clear, then the draw call if present
    fn submit(&mut self, frame: &Frame<'_, Self::Buffer>) -> Result<()>;
}

/// Build the commands for one frame.
///
/// A scene that is not ready, or holds no vertices, yields a clear-only
/// frame. Otherwise the draw covers every uploaded vertex with matrices from
/// the camera and the viewport's aspect ratio.
pub fn build_frame<'a, B>(
    number: u64,
    camera: &CameraState,
    scene: &'a SceneBuffer<B>,
    viewport: Viewport,
) -> Frame<'a, B> {
    let draw = scene
        .uploaded()
        .filter(|uploaded| uploaded.vertex_count > 0)
        .map(|uploaded| DrawCall {
            buffer: &uploaded.buffer,
            vertex_count: uploaded.vertex_count,
            uniforms: camera.to_uniform(viewport.aspect()),
        });

    Frame {
        draw,
        ..Frame::clear_only(number, viewport)
    }
}
