pub mod world;

pub use world::{load_world_file, parse_world, LoadError, ParseError, WORLD_SCALE};
