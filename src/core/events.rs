//! Global events used for cross-system communication.
//!
//! Gameplay code never calls into an enemy directly. Wrong and right answers,
//! catches and damage all travel as events, so the AI, combat and interaction
//! plugins stay independent and testable.

use bevy::prelude::*;

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    pub amount: i32,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// An interaction with `enemy` failed; it should start chasing.
///
/// With `target: None` the enemy falls back to its default chase target.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractionFailed {
    pub enemy: Entity,
    pub target: Option<Entity>,
}

/// An interaction with `enemy` succeeded; it should go back to patrolling.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractionSucceeded {
    pub enemy: Entity,
}

/// Sent once per chase episode when an enemy catches its target.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetCaught {
    pub enemy: Entity,
    pub target: Entity,
    pub damage: i32,
}
