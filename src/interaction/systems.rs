//! Target lock, questions, answer routing and staff casting.

use bevy::prelude::*;

use super::components::*;
use super::questions::{Question, QuestionState};
use crate::combat::{DamageEvent, Dead};
use crate::core::{GameSet, InteractionFailed, InteractionSucceeded};
use crate::enemies::Enemy;
use crate::player::Player;

/// Set up interaction systems.
pub fn setup_interaction_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            cycle_target,
            release_stale_lock,
            refresh_question,
            route_answers,
            cast_staff,
        )
            .chain()
            .in_set(GameSet::Input),
    );
}

/// Pick the lock after `current` among `candidates` (nearest first).
///
/// With nothing locked, or a lock that is no longer a candidate, the nearest
/// candidate wins.
pub fn next_lock(current: Option<Entity>, candidates: &[Entity]) -> Option<Entity> {
    let first = candidates.first().copied()?;
    let Some(index) = current.and_then(|locked| candidates.iter().position(|&c| c == locked)) else {
        return Some(first);
    };
    Some(candidates[(index + 1) % candidates.len()])
}

/// Handle lock-on requests.
pub fn cycle_target(
    mut requests: EventReader<CycleTarget>,
    config: Res<InteractionConfig>,
    mut lock: ResMut<TargetLock>,
    player_query: Query<&Transform, With<Player>>,
    enemy_query: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
) {
    for _ in requests.read() {
        let Ok(player_transform) = player_query.get_single() else {
            return;
        };
        let player_pos = player_transform.translation;
        let max_sqr = config.max_lock_distance * config.max_lock_distance;

        let mut in_range: Vec<(Entity, f32)> = enemy_query
            .iter()
            .map(|(entity, transform)| (entity, transform.translation.distance_squared(player_pos)))
            .filter(|&(_, distance_sqr)| distance_sqr <= max_sqr)
            .collect();
        in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
        let candidates: Vec<Entity> = in_range.into_iter().map(|(entity, _)| entity).collect();

        let previous = lock.current;
        lock.current = next_lock(previous, &candidates);
        match lock.current {
            Some(enemy) if lock.current != previous => info!("Locked on to {:?}", enemy),
            Some(_) => debug!("Cycled back to the same target"),
            None => debug!("No enemies in lock-on range"),
        }
    }
}

/// Drop the lock when the enemy is gone or out of range.
pub fn release_stale_lock(
    config: Res<InteractionConfig>,
    mut lock: ResMut<TargetLock>,
    player_query: Query<&Transform, With<Player>>,
    enemy_query: Query<&Transform, (With<Enemy>, Without<Dead>)>,
) {
    let Some(locked) = lock.current else {
        return;
    };

    let keep = match (enemy_query.get(locked), player_query.get_single()) {
        (Err(_), _) => false,
        (Ok(enemy), Ok(player)) => {
            enemy.translation.distance(player.translation) <= config.max_lock_distance
        }
        (Ok(_), Err(_)) => true,
    };

    if !keep {
        debug!("Releasing lock on {:?}", locked);
        lock.current = None;
    }
}

/// Ask a fresh question whenever the lock moves to another enemy, and drop
/// it when the lock is released.
pub fn refresh_question(
    lock: Res<TargetLock>,
    config: Res<InteractionConfig>,
    mut questions: ResMut<QuestionState>,
) {
    if questions.enemy == lock.current {
        return;
    }

    let Some(enemy) = lock.current else {
        debug!("Lock released, clearing question");
        questions.clear();
        return;
    };

    let question = Question::generate(config.question_kind, &mut rand::thread_rng());
    info!(
        "{:?} asks: {} [{}]",
        enemy,
        question.prompt,
        question.orb_labels().join(" | ")
    );
    questions.ask(enemy, question);
}

/// Judge socketed orbs against the active question and turn the verdict into
/// chase/patrol triggers for the asking enemy.
pub fn route_answers(
    mut answers: EventReader<AnswerSubmitted>,
    mut removed: EventReader<OrbRemoved>,
    questions: Res<QuestionState>,
    mut staff: ResMut<StaffState>,
    player_query: Query<Entity, With<Player>>,
    mut failed: EventWriter<InteractionFailed>,
    mut succeeded: EventWriter<InteractionSucceeded>,
) {
    if removed.read().count() > 0 {
        staff.correct_orb_attached = false;
    }

    for answer in answers.read() {
        let Some((enemy, correct)) = questions.judge(answer.value) else {
            staff.correct_orb_attached = false;
            warn!("Orb socketed with no question active");
            continue;
        };
        staff.correct_orb_attached = correct;

        if correct {
            info!("Correct answer, {:?} stands down", enemy);
            succeeded.send(InteractionSucceeded { enemy });
        } else {
            info!("Wrong answer ({}), {:?} gives chase", answer.value, enemy);
            failed.send(InteractionFailed {
                enemy,
                target: player_query.get_single().ok(),
            });
        }
    }
}

/// Cast the staff at the locked enemy. Requires the correct orb.
pub fn cast_staff(
    mut casts: EventReader<CastStaff>,
    config: Res<InteractionConfig>,
    staff: Res<StaffState>,
    lock: Res<TargetLock>,
    player_query: Query<Entity, With<Player>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for _ in casts.read() {
        if !staff.correct_orb_attached {
            info!("Cannot cast - no correct orb attached");
            continue;
        }
        let (Some(enemy), Ok(player)) = (lock.current, player_query.get_single()) else {
            continue;
        };

        damage_events.send(DamageEvent {
            target: enemy,
            source: player,
            amount: config.staff_damage,
        });
    }
}
