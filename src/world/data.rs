//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use super::navigation::WalkableArea;
use crate::enemies::EnemyRegistry;
use crate::interaction::QuestionKind;

/// Directory scanned for level files.
pub const LEVEL_DATA_DIR: &str = "assets/data/levels";

type Point = (f32, f32, f32);

fn to_vec3((x, y, z): Point) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Raw level definition as it appears in the RON file.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinitionRaw {
    pub name: String,
    /// Walkable rectangle as ((min_x, min_z), (max_x, max_z))
    pub bounds: ((f32, f32), (f32, f32)),
    #[serde(default)]
    pub floor_height: f32,
    pub player_spawn: Point,
    /// Question family asked by this level's enemies
    #[serde(default)]
    pub questions: QuestionKind,
    #[serde(default)]
    pub enemies: Vec<EnemyPlacementRaw>,
}

/// Raw enemy placement.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyPlacementRaw {
    pub enemy_type: String,
    pub position: Point,
    /// Waypoints; `None` entries are unset and skipped while patrolling
    #[serde(default)]
    pub route: Vec<Option<Point>>,
}

/// A validated enemy placement.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyPlacement {
    pub enemy_type: String,
    pub position: Vec3,
    pub route: Vec<Option<Vec3>>,
}

/// A fully resolved level.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub name: String,
    pub area: WalkableArea,
    pub player_spawn: Vec3,
    pub questions: QuestionKind,
    pub enemies: Vec<EnemyPlacement>,
}

impl LevelDefinition {
    /// Resolve a raw level, checking it against the loaded enemy types.
    pub fn from_raw(
        raw: LevelDefinitionRaw,
        enemies: &EnemyRegistry,
    ) -> Result<Self, DataLoadError> {
        let ((min_x, min_z), (max_x, max_z)) = raw.bounds;
        if min_x >= max_x || min_z >= max_z {
            return Err(DataLoadError::InvalidValue {
                field: "bounds".to_string(),
                details: format!("empty walkable area in level '{}'", raw.name),
            });
        }
        let area = WalkableArea::new(
            Vec2::new(min_x, min_z),
            Vec2::new(max_x, max_z),
            raw.floor_height,
        );

        let mut placements = Vec::with_capacity(raw.enemies.len());
        for placement in raw.enemies {
            if enemies.get(&placement.enemy_type).is_none() {
                return Err(DataLoadError::UnknownEnemyType {
                    level: raw.name.clone(),
                    enemy_type: placement.enemy_type,
                });
            }
            placements.push(EnemyPlacement {
                enemy_type: placement.enemy_type,
                position: to_vec3(placement.position),
                route: placement.route.into_iter().map(|p| p.map(to_vec3)).collect(),
            });
        }

        Ok(Self {
            name: raw.name,
            area,
            player_spawn: to_vec3(raw.player_spawn),
            questions: raw.questions,
            enemies: placements,
        })
    }
}

/// Resource storing all loaded level definitions.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.get(name)
    }
}

/// Resource indicating which level to build when gameplay starts.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: "courtyard".to_string(),
        }
    }
}

/// Parse and resolve one level file.
pub fn parse_level(
    path: &Path,
    contents: &str,
    enemies: &EnemyRegistry,
) -> Result<LevelDefinition, DataLoadError> {
    let raw = ron::from_str::<LevelDefinitionRaw>(contents).map_err(|e| DataLoadError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    LevelDefinition::from_raw(raw, enemies)
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut commands: Commands, enemy_registry: Res<EnemyRegistry>) {
    let mut registry = LevelRegistry::default();
    let levels_path = Path::new(LEVEL_DATA_DIR);

    if !levels_path.exists() {
        warn!("Levels directory not found: {:?}", levels_path);
        commands.insert_resource(registry);
        return;
    }

    if let Ok(entries) = fs::read_dir(levels_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let level_name = stem.to_string_lossy().to_string();

            let loaded = fs::read_to_string(&path)
                .map_err(|e| DataLoadError::ReadError {
                    path: path.display().to_string(),
                    details: e.to_string(),
                })
                .and_then(|contents| parse_level(&path, &contents, &enemy_registry));

            match loaded {
                Ok(level) => {
                    info!("Loaded level: {} ({} enemies)", level_name, level.enemies.len());
                    registry.levels.insert(level_name, level);
                }
                Err(e) => error!("Failed to load level {:?}: {}", path, e),
            }
        }
    }

    info!("Loaded {} level(s)", registry.levels.len());
    commands.insert_resource(registry);
}
