//! Player-related components and resources.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Entities enemies are allowed to catch. Only overlaps with a `CatchTarget`
/// reach an enemy's patrol/chase controller.
#[derive(Component)]
pub struct CatchTarget;

/// Coins collected from defeated enemies.
#[derive(Resource, Default, Debug)]
pub struct Wallet {
    pub coins: u32,
}

impl Wallet {
    pub fn add(&mut self, coins: u32) {
        self.coins = self.coins.saturating_add(coins);
    }
}

/// Configuration for the player controller.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    pub max_health: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            max_health: 100,
        }
    }
}
