pub mod clock;
pub mod controller;
pub mod display_context;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod input_mapper;
pub mod render_pipeline;
pub mod timer;

pub use clock::Clock;
pub use controller::{Button, Controller};
pub use display_context::Viewport;
pub use frame::{ClearValues, DrawCall, Frame};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use input_mapper::{map_rates, PITCH_RATE, WALK_SPEED, YAW_RATE};
pub use render_pipeline::{build_frame, RenderPipeline};
pub use timer::{TickScheduler, DEFAULT_TICK_MS};
