//! Player plugin - player resources.

use bevy::prelude::*;

use super::components::*;

/// Player plugin - resources the simulation needs, with or without input.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>().init_resource::<Wallet>();
    }
}
