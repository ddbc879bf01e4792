//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

use super::agent::steer_agents;
use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use crate::core::GameSet;

/// Enemy plugin - handles definitions, patrol/chase AI, movement and death.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            // Normally registered by the rapier plugin; headless apps run without it
            .add_event::<CollisionEvent>()
            .add_systems(Startup, load_enemy_definitions)
            .add_systems(
                Update,
                (
                    ai::apply_interaction_events,
                    ai::tick_controllers,
                    ai::forward_catch_zone_events,
                )
                    .chain()
                    .in_set(GameSet::Ai),
            )
            .add_systems(Update, steer_agents.in_set(GameSet::Movement))
            .add_systems(
                Update,
                ai::reward_and_despawn_dead_enemies.in_set(GameSet::Cleanup),
            );
    }
}
