//! Interaction resources and events.

use bevy::prelude::*;

use super::questions::QuestionKind;

/// The enemy the player is currently locked on to.
#[derive(Resource, Default, Debug)]
pub struct TargetLock {
    pub current: Option<Entity>,
}

/// Tuning for lock-on and the staff.
#[derive(Resource, Debug, Clone)]
pub struct InteractionConfig {
    /// Locks further than this from the player are released
    pub max_lock_distance: f32,
    /// Damage a staff cast deals to the locked enemy
    pub staff_damage: i32,
    /// Question family asked on lock-on; set per level
    pub question_kind: QuestionKind,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_lock_distance: 25.0,
            staff_damage: 1,
            question_kind: QuestionKind::default(),
        }
    }
}

/// Whether the orb socketed in the staff is the correct answer.
#[derive(Resource, Default, Debug)]
pub struct StaffState {
    pub correct_orb_attached: bool,
}

/// Lock on to the nearest enemy, or cycle to the next one.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CycleTarget;

/// An orb was socketed into the staff.
#[derive(Event, Debug, Clone, Copy)]
pub struct AnswerSubmitted {
    /// Value written on the orb
    pub value: f32,
}

/// The socketed orb was taken out again.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct OrbRemoved;

/// Fire the staff at the locked enemy.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CastStaff;
