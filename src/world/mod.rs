//! World module - walkable ground, level data and setup.

pub mod data;
mod error;
pub mod navigation;
mod plugin;

pub use data::{CurrentLevel, LevelDefinition, LevelRegistry};
pub use error::DataLoadError;
pub use navigation::WalkableArea;
pub use plugin::{setup_level, WorldPlugin};
