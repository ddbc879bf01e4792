//! Enemy-related components.

use bevy::prelude::*;
use std::ops::{Deref, DerefMut, RangeInclusive};

use super::fsm::PatrolChaseController;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// Patrol/chase brain of an enemy. Chase targets are entities.
#[derive(Component, Debug, Clone)]
pub struct PatrolChase(pub PatrolChaseController<Entity>);

impl Deref for PatrolChase {
    type Target = PatrolChaseController<Entity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PatrolChase {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Coins granted to the player when this enemy dies.
#[derive(Component, Clone, Debug)]
pub struct CoinReward(pub RangeInclusive<u32>);
