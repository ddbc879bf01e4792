//! Interaction plugin - lock-on, questions, answers and staff.

use bevy::prelude::*;

use super::components::*;
use super::questions::QuestionState;
use super::systems;

/// Interaction plugin - turns player answers into enemy chase/patrol events.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetLock>()
            .init_resource::<InteractionConfig>()
            .init_resource::<StaffState>()
            .init_resource::<QuestionState>()
            .add_event::<CycleTarget>()
            .add_event::<AnswerSubmitted>()
            .add_event::<OrbRemoved>()
            .add_event::<CastStaff>();

        systems::setup_interaction_systems(app);
    }
}
