//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::agent::SteeringAgent;
use super::components::{CoinReward, Enemy, EnemyType, PatrolChase};
use super::data::EnemyDefinition;
use super::fsm::PatrolChaseController;
use crate::combat::Health;

/// Spawn a patrolling enemy with a catch-zone sensor sized from its config.
///
/// `default_target` is chased when an interaction fails without naming a target.
pub fn spawn_enemy(
    commands: &mut Commands,
    enemy_type: &str,
    definition: &EnemyDefinition,
    position: Vec3,
    route: Vec<Option<Vec3>>,
    default_target: Option<Entity>,
) -> Entity {
    let config = definition.patrol.clone();
    let catch_distance = config.catch_distance;
    let patrol_speed = config.patrol_speed;

    let mut controller = PatrolChaseController::new(config, route);
    controller.set_default_target(default_target);

    commands
        .spawn((
            Name::new(definition.name.clone()),
            Enemy,
            EnemyType(enemy_type.to_string()),
            PatrolChase(controller),
            SteeringAgent {
                speed: patrol_speed,
                ..default()
            },
            Health::new(definition.max_health),
            CoinReward(definition.coin_range()),
            Transform::from_translation(position),
            // Catch zone
            RigidBody::KinematicPositionBased,
            Collider::ball(catch_distance),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::all(),
        ))
        .id()
}
