//! World plugin - level loading and setup.

use bevy::prelude::*;

use crate::core::GameState;
use crate::enemies::data::load_enemy_definitions;
use crate::enemies::{spawn_enemy, EnemyRegistry};
use crate::interaction::InteractionConfig;
use crate::player::{spawn_player, Player, PlayerConfig};

use super::data::{load_level_definitions, CurrentLevel, LevelRegistry, LEVEL_DATA_DIR};
use super::error::DataLoadError;
use super::navigation::WalkableArea;

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WalkableArea>()
            .init_resource::<LevelRegistry>()
            .add_systems(Startup, load_level_definitions.after(load_enemy_definitions))
            .add_systems(
                OnEnter(GameState::InGame),
                setup_level.run_if(resource_exists::<CurrentLevel>),
            );
    }
}

/// Set up the current level: walkable area, player and patrolling enemies.
pub fn setup_level(
    mut commands: Commands,
    level_registry: Res<LevelRegistry>,
    current_level: Res<CurrentLevel>,
    enemy_registry: Res<EnemyRegistry>,
    player_config: Res<PlayerConfig>,
    mut interaction_config: ResMut<InteractionConfig>,
    existing_player: Query<(), With<Player>>,
) {
    // Leaving Paused re-enters InGame; the level is already built then.
    if !existing_player.is_empty() {
        return;
    }

    let Some(level) = level_registry.get(&current_level.name) else {
        let path = format!("{}/{}.ron", LEVEL_DATA_DIR, current_level.name);
        let err = DataLoadError::FileNotFound(path);
        error!("Level '{}' not available: {}", current_level.name, err);
        return;
    };

    info!("Building level: {}", level.name);
    commands.insert_resource(level.area);
    interaction_config.question_kind = level.questions;

    let player = spawn_player(&mut commands, &player_config, level.player_spawn);

    for placement in &level.enemies {
        let Some(definition) = enemy_registry.get(&placement.enemy_type) else {
            // Levels are validated against the registry at load time.
            continue;
        };
        spawn_enemy(
            &mut commands,
            &placement.enemy_type,
            definition,
            placement.position,
            placement.route.clone(),
            Some(player),
        );
    }
}
