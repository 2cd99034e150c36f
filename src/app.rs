use std::path::PathBuf;

use crate::camera::CameraState;
use crate::core::{build_frame, map_rates, RenderPipeline, Viewport, WinitController};
use crate::scene::{LoadStatus, SceneBuffer};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Everything the update and render steps share: camera, held keys, and the
/// scene buffer. `B` is the render backend's buffer handle.
pub struct AppContext<B> {
    pub camera: CameraState,
    pub controller: WinitController,
    scene: SceneBuffer<B>,
    frame_number: u64,
}

impl<B> AppContext<B> {
    pub fn new() -> Self {
        Self {
            camera: CameraState::new(),
            controller: WinitController::new(),
            scene: SceneBuffer::new(),
            frame_number: 0,
        }
    }

    /// Kick off the background world load
    pub fn load_world(&mut self, path: impl Into<PathBuf>) {
        self.scene.begin_load(path);
    }

    pub fn scene(&self) -> &SceneBuffer<B> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneBuffer<B> {
        &mut self.scene
    }

    pub fn load_status(&self) -> LoadStatus<'_> {
        self.scene.status()
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// One update step: finish a pending upload, re-derive rates from the
    /// held keys, then advance the camera to `now_ms`
    pub fn tick<P>(&mut self, now_ms: f64, pipeline: &mut P)
    where
        P: RenderPipeline<Buffer = B>,
    {
        self.scene.poll(pipeline);
        self.camera.rates = map_rates(&self.controller);
        self.camera.advance(now_ms);
    }

    /// Build and submit one frame
    pub fn render<P>(&mut self, pipeline: &mut P, viewport: Viewport) -> Result<()>
    where
        P: RenderPipeline<Buffer = B>,
    {
        let frame = build_frame(self.frame_number, &self.camera, &self.scene, viewport);
        self.frame_number += 1;
        pipeline.submit(&frame)
    }
}

impl<B> Default for AppContext<B> {
    fn default() -> Self {
        Self::new()
    }
}
