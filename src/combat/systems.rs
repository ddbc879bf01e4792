//! Damage resolution.

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::*;
use crate::core::GameSet;

/// Set up combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app.add_systems(Update, apply_damage.in_set(GameSet::Damage));
}

/// Apply queued damage to health and announce deaths.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Option<&Dead>)>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        let Ok((mut health, dead)) = health_query.get_mut(event.target) else {
            continue;
        };
        // Skip if already dead (from previous frames)
        if dead.is_some() {
            continue;
        }

        let dealt = health.take_damage(event.amount);
        debug!(
            "{:?} took {} damage from {:?} ({}/{})",
            event.target, dealt, event.source, health.current, health.maximum
        );

        if health.is_dead() {
            died_this_frame.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}
