//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::world::DataLoadError;

/// Directory scanned for enemy definitions.
pub const ENEMY_DATA_DIR: &str = "assets/data/enemies";

/// Patrol/chase tuning for one enemy type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PatrolChaseConfig {
    /// Seconds spent standing at each waypoint
    pub patrol_wait_time: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Abandon the chase when the target gets farther than `lose_distance`
    pub allow_stop_chase_if_far: bool,
    pub lose_distance: f32,
    /// Radius of the catch sensor
    pub catch_distance: f32,
    /// Go back to patrolling right after a catch
    pub stop_after_catch: bool,
    /// Radius used to project destinations onto walkable ground
    pub nav_sample_radius: f32,
    /// Radius searched when the agent itself is off walkable ground
    pub agent_warp_search_radius: f32,
    /// Minimum seconds between chase path requests
    pub chase_repath_interval: f32,
    pub damage_on_catch: i32,
}

impl Default for PatrolChaseConfig {
    fn default() -> Self {
        Self {
            patrol_wait_time: 1.5,
            patrol_speed: 2.5,
            chase_speed: 4.5,
            allow_stop_chase_if_far: true,
            lose_distance: 12.0,
            catch_distance: 1.2,
            stop_after_catch: true,
            nav_sample_radius: 2.0,
            agent_warp_search_radius: 3.0,
            chase_repath_interval: 0.15,
            damage_on_catch: 10,
        }
    }
}

impl PatrolChaseConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let non_negative = [
            ("patrol_wait_time", self.patrol_wait_time),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
            ("lose_distance", self.lose_distance),
            ("nav_sample_radius", self.nav_sample_radius),
            ("agent_warp_search_radius", self.agent_warp_search_radius),
            ("chase_repath_interval", self.chase_repath_interval),
            ("damage_on_catch", self.damage_on_catch as f32),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DataLoadError::InvalidValue {
                    field: field.to_string(),
                    details: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if self.catch_distance.is_nan() || self.catch_distance <= 0.0 {
            return Err(DataLoadError::InvalidValue {
                field: "catch_distance".to_string(),
                details: format!("must be positive, got {}", self.catch_distance),
            });
        }
        Ok(())
    }
}

fn default_max_health() -> i32 {
    1
}

fn default_coin_reward() -> (u32, u32) {
    (5, 15)
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    #[serde(default = "default_max_health")]
    pub max_health: i32,
    /// Inclusive coin range awarded on death
    #[serde(default = "default_coin_reward")]
    pub coin_reward: (u32, u32),
    #[serde(default)]
    pub patrol: PatrolChaseConfig,
}

impl EnemyDefinition {
    pub fn coin_range(&self) -> RangeInclusive<u32> {
        let (low, high) = self.coin_reward;
        low.min(high)..=low.max(high)
    }
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Sentinel".to_string(),
            max_health: default_max_health(),
            coin_reward: default_coin_reward(),
            patrol: PatrolChaseConfig::default(),
        }
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }
}

/// Parse and validate one enemy definition.
pub fn parse_enemy_definition(
    path: &Path,
    contents: &str,
) -> Result<EnemyDefinition, DataLoadError> {
    let definition: EnemyDefinition =
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

    if definition.max_health <= 0 {
        return Err(DataLoadError::InvalidValue {
            field: "max_health".to_string(),
            details: format!("must be positive, got {}", definition.max_health),
        });
    }
    definition.patrol.validate()?;
    Ok(definition)
}

fn read_enemy_definition(path: &Path) -> Result<EnemyDefinition, DataLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    parse_enemy_definition(path, &contents)
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(ENEMY_DATA_DIR);

    if !enemies_dir.exists() {
        warn!("Enemy definitions directory not found: {:?}", enemies_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(enemies_dir) else {
        warn!("Failed to read enemy definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "ron") {
            let enemy_type = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match read_enemy_definition(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                    registry.definitions.insert(enemy_type, definition);
                }
                Err(e) => error!("Skipping enemy definition: {}", e),
            }
        }
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}
