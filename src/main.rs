//! Patrol/Chase Sentinels - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Tab: Lock on / cycle target
//! - 1-4: Socket the matching answer orb
//! - R: Remove the orb
//! - Space: Cast the staff
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use patrol_chase::player::PlayerControlPlugin;
use patrol_chase::world::CurrentLevel;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Patrol/Chase Sentinels".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics (catch sensors)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(patrol_chase::PatrolChasePlugin)
        .add_plugins(PlayerControlPlugin)

        .insert_resource(CurrentLevel::default())

        .run();
}
