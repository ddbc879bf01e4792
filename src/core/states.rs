//! Game state definitions and system ordering.
//!
//! States determine which systems run at any given time. The patrol/chase
//! simulation only advances in `InGame`; `Paused` freezes it in place.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
}

/// Per-frame ordering of gameplay systems.
///
/// Input turns player actions into events, Ai consumes them and drives the
/// controllers, Movement integrates agent motion, Damage resolves health and
/// Cleanup despawns the dead.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Ai,
    Movement,
    Damage,
    Cleanup,
}
