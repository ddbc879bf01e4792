//! Core plugin that sets up game states, events, and system ordering.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused)
/// - Global events (DamageEvent, InteractionFailed, etc.)
/// - The chained `GameSet` ordering, gated on `InGame`
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<InteractionFailed>()
            .add_event::<InteractionSucceeded>()
            .add_event::<TargetCaught>()

            .configure_sets(
                Update,
                (
                    GameSet::Input,
                    GameSet::Ai,
                    GameSet::Movement,
                    GameSet::Damage,
                    GameSet::Cleanup,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )

            // Startup loads data synchronously, so the first frame can start the game
            .add_systems(Update, finish_loading.run_if(in_state(GameState::Loading)));
    }
}

/// Leave Loading once the Startup data loaders have run.
fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
