//! Keyboard controls and debug visuals for the playable demo.
//!
//! Kept out of `PlayerPlugin` so headless apps can run the simulation
//! without input or rendering resources.
//!
//! Controls:
//! - WASD: Move
//! - Tab: Lock on / cycle target
//! - 1-4: Socket the matching answer orb
//! - R: Remove the orb
//! - Space: Cast the staff
//! - Escape: Pause/Unpause

use bevy::prelude::*;

use super::components::{Player, PlayerConfig};
use crate::core::{GameSet, GameState};
use crate::enemies::{ChaseState, Enemy, PatrolChase};
use crate::interaction::{
    AnswerSubmitted, CastStaff, CycleTarget, OrbRemoved, QuestionState, ORB_COUNT,
};
use crate::world::WalkableArea;

/// Demo plugin - keyboard input, a top-down camera and placeholder meshes.
pub struct PlayerControlPlugin;

impl Plugin for PlayerControlPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, setup_debug_materials))
            .add_systems(
                Update,
                (player_movement, player_actions).in_set(GameSet::Input),
            )
            .add_systems(
                Update,
                (attach_player_mesh, attach_enemy_meshes, tint_enemies)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Update, toggle_pause);
    }
}

/// Materials shared by every debug mesh.
#[derive(Resource)]
struct DebugMaterials {
    ground: Handle<StandardMaterial>,
    player: Handle<StandardMaterial>,
    patrolling: Handle<StandardMaterial>,
    chasing: Handle<StandardMaterial>,
}

fn setup_debug_materials(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    let mut flat = |color: Color| {
        materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.9,
            ..default()
        })
    };

    commands.insert_resource(DebugMaterials {
        ground: flat(Color::srgb(0.25, 0.27, 0.22)),
        player: flat(Color::srgb(0.3, 0.5, 0.9)),
        patrolling: flat(Color::srgb(0.8, 0.75, 0.4)),
        chasing: flat(Color::srgb(0.9, 0.2, 0.15)),
    });
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, 28.0, 18.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Move the player on the XZ plane, staying inside the walkable area.
fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    area: Res<WalkableArea>,
    mut player_query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = player_query.get_single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }

    if direction == Vec3::ZERO {
        return;
    }

    let step = direction.normalize() * config.move_speed * time.delta_secs();
    let next = transform.translation + step;
    transform.translation.x = next.x.clamp(area.min.x, area.max.x);
    transform.translation.z = next.z.clamp(area.min.y, area.max.y);
}

const ORB_KEYS: [KeyCode; ORB_COUNT] =
    [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];

/// Translate key presses into interaction events.
fn player_actions(
    keyboard: Res<ButtonInput<KeyCode>>,
    questions: Res<QuestionState>,
    mut cycle: EventWriter<CycleTarget>,
    mut answers: EventWriter<AnswerSubmitted>,
    mut removed: EventWriter<OrbRemoved>,
    mut casts: EventWriter<CastStaff>,
) {
    if keyboard.just_pressed(KeyCode::Tab) {
        cycle.send(CycleTarget);
    }
    for (index, key) in ORB_KEYS.into_iter().enumerate() {
        if !keyboard.just_pressed(key) {
            continue;
        }
        match questions.current.as_ref().and_then(|question| question.orb(index)) {
            Some(value) => {
                answers.send(AnswerSubmitted { value });
            }
            None => info!("No question to answer - lock on with Tab first"),
        }
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        removed.send(OrbRemoved);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        casts.send(CastStaff);
    }
}

fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    match state.get() {
        GameState::InGame => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::InGame),
        GameState::Loading => {}
    }
}

/// Give the freshly spawned player a capsule and lay down the floor under it.
fn attach_player_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<DebugMaterials>,
    area: Res<WalkableArea>,
    player_query: Query<Entity, Added<Player>>,
) {
    for player in player_query.iter() {
        commands.entity(player).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
            MeshMaterial3d(materials.player.clone()),
        ));

        let size = area.size();
        let center = area.center();
        commands.spawn((
            Name::new("Ground"),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.y))),
            MeshMaterial3d(materials.ground.clone()),
            Transform::from_xyz(center.x, area.height - 0.8, center.z),
        ));
    }
}

fn attach_enemy_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<DebugMaterials>,
    enemy_query: Query<Entity, Added<Enemy>>,
) {
    for enemy in enemy_query.iter() {
        commands.entity(enemy).insert((
            Mesh3d(meshes.add(Cuboid::new(0.8, 1.6, 0.8))),
            MeshMaterial3d(materials.patrolling.clone()),
        ));
    }
}

/// Show chasing enemies in red.
fn tint_enemies(
    materials: Res<DebugMaterials>,
    mut enemy_query: Query<(&PatrolChase, &mut MeshMaterial3d<StandardMaterial>), With<Enemy>>,
) {
    for (brain, mut material) in enemy_query.iter_mut() {
        let wanted = match brain.state() {
            ChaseState::Patrolling => &materials.patrolling,
            ChaseState::Chasing => &materials.chasing,
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}
