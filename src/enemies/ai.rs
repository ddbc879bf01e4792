//! Enemy AI systems - drive each enemy's patrol/chase controller.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;
use rand::Rng;

use super::agent::{AgentView, SteeringAgent};
use super::components::{CoinReward, Enemy, EnemyType, PatrolChase};
use super::fsm::{ChaseState, DamageSink};
use crate::combat::{DamageEvent, Dead, DeathEvent};
use crate::core::{InteractionFailed, InteractionSucceeded, TargetCaught};
use crate::player::{CatchTarget, Wallet};
use crate::world::WalkableArea;

type LiveEnemy = (With<Enemy>, Without<Dead>);

/// Routes catch damage into the combat event stream.
struct DamageEventSink<'a, 'w> {
    writer: &'a mut EventWriter<'w, DamageEvent>,
    source: Entity,
    target: Entity,
}

impl DamageSink for DamageEventSink<'_, '_> {
    fn apply_damage(&mut self, amount: i32) {
        self.writer.send(DamageEvent {
            target: self.target,
            source: self.source,
            amount,
        });
    }
}

/// Start or stop chases in response to interaction outcomes.
pub fn apply_interaction_events(
    mut failed: EventReader<InteractionFailed>,
    mut succeeded: EventReader<InteractionSucceeded>,
    mut enemies: Query<&mut PatrolChase, LiveEnemy>,
) {
    for event in failed.read() {
        let Ok(mut brain) = enemies.get_mut(event.enemy) else {
            warn!("Interaction failed on {:?}, which has no patrol/chase controller", event.enemy);
            continue;
        };

        brain.notify_interaction_failed(event.target);
        if brain.state() == ChaseState::Chasing {
            info!("Enemy {:?} is now chasing {:?}", event.enemy, brain.chase_target());
        }
    }

    for event in succeeded.read() {
        if let Ok(mut brain) = enemies.get_mut(event.enemy) {
            brain.return_to_patrol();
            info!("Enemy {:?} returns to patrol", event.enemy);
        }
    }
}

/// Advance every controller by one frame.
pub fn tick_controllers(
    time: Res<Time>,
    area: Res<WalkableArea>,
    mut enemies: Query<(&mut PatrolChase, &mut Transform, &mut SteeringAgent), LiveEnemy>,
    targets: Query<&Transform, (Without<Enemy>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    // Despawned or dead targets resolve to None, which ends the chase.
    let lookup = |target: Entity| targets.get(target).ok().map(|transform| transform.translation);

    for (mut brain, mut transform, mut agent) in enemies.iter_mut() {
        let mut view = AgentView {
            transform: &mut transform,
            agent: &mut agent,
            area: &area,
        };
        brain.tick(dt, &mut view, &lookup);
    }
}

/// Forward catch-zone sensor overlaps between an enemy and a `CatchTarget`
/// to the enemy's controller.
pub fn forward_catch_zone_events(
    mut collisions: EventReader<CollisionEvent>,
    area: Res<WalkableArea>,
    catch_targets: Query<(), With<CatchTarget>>,
    mut enemies: Query<(&mut PatrolChase, &mut Transform, &mut SteeringAgent), LiveEnemy>,
    mut damage_events: EventWriter<DamageEvent>,
    mut caught_events: EventWriter<TargetCaught>,
) {
    for collision in collisions.read() {
        let (a, b, entered) = match *collision {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        let (enemy, target) = if enemies.contains(a) && catch_targets.contains(b) {
            (a, b)
        } else if enemies.contains(b) && catch_targets.contains(a) {
            (b, a)
        } else {
            continue;
        };

        let Ok((mut brain, mut transform, mut agent)) = enemies.get_mut(enemy) else {
            continue;
        };

        if !entered {
            brain.on_catch_zone_exit(target);
            continue;
        }

        let mut view = AgentView {
            transform: &mut transform,
            agent: &mut agent,
            area: &area,
        };
        let mut sink = DamageEventSink {
            writer: &mut damage_events,
            source: enemy,
            target,
        };

        if brain.on_catch_zone_enter(target, &mut view, &mut sink) {
            caught_events.send(TargetCaught {
                enemy,
                target,
                damage: brain.config().damage_on_catch,
            });
        }
    }
}

/// Pay out coins for dead enemies and remove them from the world.
pub fn reward_and_despawn_dead_enemies(
    mut commands: Commands,
    mut deaths: EventReader<DeathEvent>,
    enemies: Query<(&EnemyType, Option<&CoinReward>), With<Enemy>>,
    mut wallet: ResMut<Wallet>,
) {
    let mut rng = rand::thread_rng();

    for death in deaths.read() {
        let Ok((enemy_type, reward)) = enemies.get(death.entity) else {
            continue;
        };

        if let Some(reward) = reward {
            let coins = rng.gen_range(reward.0.clone());
            wallet.add(coins);
            info!("Player received {} coins from {} ({} total)", coins, enemy_type.0, wallet.coins);
        }

        info!("{} died", enemy_type.0);
        commands.entity(death.entity).despawn_recursive();
    }
}
