use super::display_context::Viewport;
use crate::types::SceneUniforms;

/// Colour and depth every frame starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValues {
    pub color: [f64; 4],
    pub depth: f32,
}

impl ClearValues {
    pub const BLACK: Self = Self {
        color: [0.0, 0.0, 0.0, 1.0],
        depth: 1.0,
    };
}

/// Triangle-list draw over an uploaded buffer
#[derive(Debug)]
pub struct DrawCall<'a, B> {
    pub buffer: &'a B,
    pub vertex_count: u32,
    pub uniforms: SceneUniforms,
}

/// Commands for one frame: always a clear, and a draw once the scene is ready
#[derive(Debug)]
pub struct Frame<'a, B> {
    pub number: u64,
    pub viewport: Viewport,
    pub clear: ClearValues,
    pub draw: Option<DrawCall<'a, B>>,
}

impl<B> Frame<'_, B> {
    /// Frame that only clears
    pub fn clear_only(number: u64, viewport: Viewport) -> Self {
        Self {
            number,
            viewport,
            clear: ClearValues::BLACK,
            draw: None,
        }
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }
}
