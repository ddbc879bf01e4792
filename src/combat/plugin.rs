//! Combat plugin - health and damage.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - turns `DamageEvent`s into health changes and deaths.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
