//! Player module - the catch target, its wallet and the demo controls.

mod components;
mod controls;
mod plugin;
mod spawning;

pub use components::*;
pub use controls::PlayerControlPlugin;
pub use plugin::PlayerPlugin;
pub use spawning::spawn_player;
