//! Patrol/Chase Sentinels - enemies that guard a route until provoked.
//!
//! Each sentinel walks a loop of waypoints. Answer one of its questions
//! wrong while it is locked on and it chases you down. Once it catches you it
//! deals its damage a single time and then goes back to its route.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, system ordering
//! - **Combat**: Health, damage and death
//! - **Enemies**: The patrol/chase controller, steering and catch sensors
//! - **Interaction**: Target lock, answer routing and the staff
//! - **Player**: The catch target, wallet and demo controls
//! - **World**: Walkable area and level data
//!
//! The controller in [`enemies::fsm`] has no ECS dependency and can be driven by
//! any navigation provider through the [`enemies::NavAgent`] trait.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod interaction;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all simulation sub-plugins.
///
/// Input and rendering live in [`player::PlayerControlPlugin`], so this plugin
/// runs headless on top of `MinimalPlugins`.
pub struct PatrolChasePlugin;

impl Plugin for PatrolChasePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player resources
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Lock-on and answers
            .add_plugins(interaction::InteractionPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
