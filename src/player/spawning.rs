//! Player spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{CatchTarget, Player, PlayerConfig};
use crate::combat::Health;

/// Spawn the player as a catchable kinematic capsule.
pub fn spawn_player(commands: &mut Commands, config: &PlayerConfig, position: Vec3) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            CatchTarget,
            Health::new(config.max_health),
            Transform::from_translation(position),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            ActiveCollisionTypes::all(),
        ))
        .id()
}
