pub mod app;
pub mod camera;
pub mod cli;
pub mod core;
pub mod loaders;
pub mod renderer;
pub mod scene;
pub mod types;

pub use app::AppContext;
pub use camera::{CameraState, MotionRates};
pub use loaders::{load_world_file, parse_world, LoadError, ParseError};
pub use scene::{LoadStatus, Scene, SceneBuffer};
