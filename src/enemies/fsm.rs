//! Patrol/chase state machine for a single enemy.
//!
//! The controller is engine-agnostic: it never touches the ECS. Movement,
//! damage and target liveness are reached through the [`NavAgent`],
//! [`DamageSink`] and [`TargetLookup`] traits, which the Bevy systems in
//! `ai.rs` implement over components and events.
//!
//! Waiting at a waypoint is a [`Timer`] polled once per [`tick`], so a chase
//! trigger arriving mid-wait cancels the wait on the spot.
//!
//! [`tick`]: PatrolChaseController::tick

use std::fmt::Debug;
use std::time::Duration;

use bevy::log::{debug, info};
use bevy::math::Vec3;
use bevy::time::{Timer, TimerMode};

use super::data::PatrolChaseConfig;

/// Slack added to the agent's stopping distance when deciding arrival.
pub const ARRIVAL_TOLERANCE: f32 = 0.1;

/// Movement capability the controller drives. It never plans paths itself.
pub trait NavAgent {
    fn position(&self) -> Vec3;
    /// Whether the agent currently stands on walkable ground.
    fn is_on_surface(&self) -> bool;
    /// Nearest walkable point within `radius` of `point`.
    fn sample_surface(&self, point: Vec3, radius: f32) -> Option<Vec3>;
    fn warp(&mut self, point: Vec3);
    /// Request a path to `point`. Returns false when the request is rejected.
    fn move_to(&mut self, point: Vec3) -> bool;
    fn set_speed(&mut self, speed: f32);
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn is_path_pending(&self) -> bool;
    fn is_path_invalid(&self) -> bool;
    fn set_stopped(&mut self, stopped: bool);
    fn clear_path(&mut self);
    /// Zero velocity and drop the current path.
    fn halt(&mut self);
}

/// Receives damage when the chased target is caught.
pub trait DamageSink {
    fn apply_damage(&mut self, amount: i32);
}

/// Resolves a target handle to a world position, `None` once the target is gone.
pub trait TargetLookup<H> {
    fn position(&self, target: H) -> Option<Vec3>;
}

impl<H, F> TargetLookup<H> for F
where
    F: Fn(H) -> Option<Vec3>,
{
    fn position(&self, target: H) -> Option<Vec3> {
        self(target)
    }
}

/// Behavioral mode of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChaseState {
    #[default]
    Patrolling,
    Chasing,
}

#[derive(Debug, Clone)]
enum PatrolPhase {
    /// No valid waypoint, or no state entered yet.
    Idle,
    /// Heading to the current waypoint. `issued` is false while the move
    /// command still has to be (re)sent.
    Travelling { issued: bool },
    Waiting(Timer),
}

enum MoveOutcome {
    Issued,
    Rejected,
    /// Agent is off the walkable surface and could not be recovered.
    Skipped,
}

/// Per-enemy patrol/chase controller.
#[derive(Debug, Clone)]
pub struct PatrolChaseController<H> {
    config: PatrolChaseConfig,
    route: Vec<Option<Vec3>>,
    state: ChaseState,
    patrol_index: Option<usize>,
    phase: PatrolPhase,
    chase_target: Option<H>,
    default_target: Option<H>,
    has_caught_target: bool,
    in_catch_zone: bool,
    repath_cooldown: f32,
    pending_entry: bool,
}

impl<H: Copy + PartialEq + Debug> PatrolChaseController<H> {
    /// Create a controller in the Patrolling state. The entry action runs on
    /// the first [`tick`](Self::tick).
    pub fn new(config: PatrolChaseConfig, route: Vec<Option<Vec3>>) -> Self {
        let patrol_index = next_valid_index(&route, 0);
        Self {
            config,
            route,
            state: ChaseState::Patrolling,
            patrol_index,
            phase: PatrolPhase::Idle,
            chase_target: None,
            default_target: None,
            has_caught_target: false,
            in_catch_zone: false,
            repath_cooldown: 0.0,
            pending_entry: true,
        }
    }

    pub fn with_default_target(mut self, target: H) -> Self {
        self.default_target = Some(target);
        self
    }

    pub fn set_default_target(&mut self, target: Option<H>) {
        self.default_target = target;
    }

    pub fn state(&self) -> ChaseState {
        self.state
    }

    pub fn chase_target(&self) -> Option<H> {
        self.chase_target
    }

    pub fn has_caught_target(&self) -> bool {
        self.has_caught_target
    }

    pub fn is_in_catch_zone(&self) -> bool {
        self.in_catch_zone
    }

    pub fn patrol_index(&self) -> Option<usize> {
        self.patrol_index
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, PatrolPhase::Waiting(_))
    }

    pub fn config(&self) -> &PatrolChaseConfig {
        &self.config
    }

    pub fn route(&self) -> &[Option<Vec3>] {
        &self.route
    }

    /// Start (or retarget) a chase. Falls back to the default target when
    /// `target` is `None`; does nothing if neither is available.
    pub fn notify_interaction_failed(&mut self, target: Option<H>) {
        let Some(resolved) = target.or(self.default_target) else {
            debug!("Interaction failed but no chase target is available");
            return;
        };

        self.has_caught_target = false;
        self.chase_target = Some(resolved);
        // A new target must not wait out the previous repath cooldown.
        self.repath_cooldown = 0.0;
        // Re-enter even when already chasing: a catch may have halted the agent.
        self.force_state(ChaseState::Chasing);
    }

    /// Abandon any chase and go back to the patrol route.
    pub fn return_to_patrol(&mut self) {
        self.has_caught_target = false;
        self.chase_target = None;
        self.change_state(ChaseState::Patrolling);
    }

    /// Advance the state machine by `dt` seconds.
    pub fn tick<A, T>(&mut self, dt: f32, agent: &mut A, targets: &T)
    where
        A: NavAgent + ?Sized,
        T: TargetLookup<H> + ?Sized,
    {
        // Non-finite or negative steps advance nothing.
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.run_pending_entry(agent);

        match self.state {
            ChaseState::Patrolling => self.tick_patrol(dt, agent),
            ChaseState::Chasing => self.tick_chase(dt, agent, targets),
        }

        // Transitions taken during this tick enter their new state right away.
        self.run_pending_entry(agent);
    }

    /// The catch zone started overlapping `other`. Returns true when this
    /// triggered a catch.
    pub fn on_catch_zone_enter<A, D>(&mut self, other: H, agent: &mut A, sink: &mut D) -> bool
    where
        A: NavAgent + ?Sized,
        D: DamageSink + ?Sized,
    {
        self.in_catch_zone = true;

        if self.state != ChaseState::Chasing || self.has_caught_target {
            return false;
        }
        if self.chase_target != Some(other) {
            return false;
        }

        self.has_caught_target = true;
        agent.halt();
        sink.apply_damage(self.config.damage_on_catch);
        info!("Caught {:?}, dealt {} damage", other, self.config.damage_on_catch);

        if self.config.stop_after_catch {
            self.change_state(ChaseState::Patrolling);
            self.run_pending_entry(agent);
        }
        true
    }

    /// The catch zone stopped overlapping `other`. Does not end the chase.
    pub fn on_catch_zone_exit(&mut self, _other: H) {
        self.in_catch_zone = false;
    }

    fn change_state(&mut self, new_state: ChaseState) {
        if self.state == new_state {
            return;
        }
        self.force_state(new_state);
    }

    fn force_state(&mut self, new_state: ChaseState) {
        debug!("Patrol/chase transition {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.phase = PatrolPhase::Idle;
        self.pending_entry = true;

        if new_state == ChaseState::Patrolling {
            self.chase_target = None;
            self.has_caught_target = false;
        }
    }

    fn run_pending_entry<A: NavAgent + ?Sized>(&mut self, agent: &mut A) {
        if !self.pending_entry {
            return;
        }
        self.pending_entry = false;

        self.ensure_on_surface(agent);
        agent.set_stopped(false);
        agent.clear_path();

        match self.state {
            ChaseState::Patrolling => {
                agent.set_speed(self.config.patrol_speed);
                self.patrol_index = self
                    .patrol_index
                    .and_then(|index| next_valid_index(&self.route, index))
                    .or_else(|| next_valid_index(&self.route, 0));
                self.issue_patrol_destination(agent);
            }
            ChaseState::Chasing => {
                agent.set_speed(self.config.chase_speed);
                self.repath_cooldown = 0.0;
            }
        }
    }

    fn tick_patrol<A: NavAgent + ?Sized>(&mut self, dt: f32, agent: &mut A) {
        match self.phase {
            PatrolPhase::Idle => {}
            PatrolPhase::Travelling { issued: false } => self.issue_patrol_destination(agent),
            PatrolPhase::Travelling { issued: true } => {
                if agent.is_path_pending() {
                    return;
                }
                if agent.is_path_invalid() {
                    debug!("Waypoint {:?} unreachable, skipping", self.patrol_index);
                    self.advance_patrol(agent);
                    return;
                }
                if agent.remaining_distance() <= agent.stopping_distance() + ARRIVAL_TOLERANCE {
                    agent.set_stopped(true);
                    self.phase = PatrolPhase::Waiting(Timer::new(
                        seconds(self.config.patrol_wait_time),
                        TimerMode::Once,
                    ));
                }
            }
            PatrolPhase::Waiting(ref mut timer) => {
                timer.tick(seconds(dt));
                if timer.finished() {
                    agent.set_stopped(false);
                    self.advance_patrol(agent);
                }
            }
        }
    }

    fn tick_chase<A, T>(&mut self, dt: f32, agent: &mut A, targets: &T)
    where
        A: NavAgent + ?Sized,
        T: TargetLookup<H> + ?Sized,
    {
        let Some(target) = self.chase_target else {
            self.change_state(ChaseState::Patrolling);
            return;
        };
        let Some(target_position) = targets.position(target) else {
            debug!("Chase target {:?} is gone", target);
            self.return_to_patrol();
            return;
        };

        if self.config.allow_stop_chase_if_far {
            let lose_sqr = self.config.lose_distance * self.config.lose_distance;
            if flat_distance_squared(agent.position(), target_position) > lose_sqr {
                debug!("Chase target {:?} out of range, giving up", target);
                self.return_to_patrol();
                return;
            }
        }

        self.repath_cooldown -= dt;
        if self.repath_cooldown <= 0.0 && !self.has_caught_target {
            match self.set_destination_safe(agent, target_position) {
                MoveOutcome::Issued | MoveOutcome::Rejected => {
                    self.repath_cooldown = self.config.chase_repath_interval;
                }
                // Leave the cooldown expired so the next tick retries.
                MoveOutcome::Skipped => {}
            }
        }
    }

    fn advance_patrol<A: NavAgent + ?Sized>(&mut self, agent: &mut A) {
        self.patrol_index = self
            .patrol_index
            .and_then(|index| next_valid_index(&self.route, index + 1));
        self.issue_patrol_destination(agent);
    }

    fn issue_patrol_destination<A: NavAgent + ?Sized>(&mut self, agent: &mut A) {
        let Some(index) = self.patrol_index else {
            self.phase = PatrolPhase::Idle;
            return;
        };
        let Some(point) = self.route.get(index).copied().flatten() else {
            self.phase = PatrolPhase::Idle;
            return;
        };

        self.phase = match self.set_destination_safe(agent, point) {
            MoveOutcome::Issued => PatrolPhase::Travelling { issued: true },
            MoveOutcome::Skipped => PatrolPhase::Travelling { issued: false },
            MoveOutcome::Rejected => {
                debug!("Waypoint {} rejected, trying the next one", index);
                self.patrol_index = next_valid_index(&self.route, index + 1);
                PatrolPhase::Travelling { issued: false }
            }
        };
    }

    fn ensure_on_surface<A: NavAgent + ?Sized>(&self, agent: &mut A) {
        if agent.is_on_surface() {
            return;
        }
        if let Some(point) =
            agent.sample_surface(agent.position(), self.config.agent_warp_search_radius)
        {
            agent.warp(point);
        }
    }

    fn set_destination_safe<A>(&self, agent: &mut A, point: Vec3) -> MoveOutcome
    where
        A: NavAgent + ?Sized,
    {
        self.ensure_on_surface(agent);
        if !agent.is_on_surface() {
            debug!("Agent off walkable surface, skipping move command");
            return MoveOutcome::Skipped;
        }

        let destination = agent
            .sample_surface(point, self.config.nav_sample_radius)
            .unwrap_or(point);
        if agent.move_to(destination) {
            MoveOutcome::Issued
        } else {
            MoveOutcome::Rejected
        }
    }
}

/// Seconds as a `Duration`. Negative, NaN and overflowing values become zero.
fn seconds(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or_default()
}

/// First waypoint at or after `start` (wrapping) that is set.
pub fn next_valid_index(route: &[Option<Vec3>], start: usize) -> Option<usize> {
    let len = route.len();
    if len == 0 {
        return None;
    }
    (0..len)
        .map(|offset| (start + offset) % len)
        .find(|&index| route[index].is_some())
}

/// Squared distance on the ground plane.
pub fn flat_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeAgent {
        position: Vec3,
        destination: Option<Vec3>,
        speed: f32,
        stopped: bool,
        halted: u32,
        off_surface: bool,
        recoverable: bool,
        reject_moves: bool,
        path_invalid: bool,
        moves: Vec<Vec3>,
    }

    impl NavAgent for FakeAgent {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn is_on_surface(&self) -> bool {
            !self.off_surface
        }
        fn sample_surface(&self, point: Vec3, _radius: f32) -> Option<Vec3> {
            if self.off_surface && !self.recoverable {
                None
            } else {
                Some(point)
            }
        }
        fn warp(&mut self, point: Vec3) {
            self.position = point;
            self.off_surface = false;
        }
        fn move_to(&mut self, point: Vec3) -> bool {
            if self.reject_moves {
                return false;
            }
            self.destination = Some(point);
            self.moves.push(point);
            true
        }
        fn set_speed(&mut self, speed: f32) {
            self.speed = speed;
        }
        fn remaining_distance(&self) -> f32 {
            self.destination
                .map(|d| flat_distance_squared(self.position, d).sqrt())
                .unwrap_or(0.0)
        }
        fn stopping_distance(&self) -> f32 {
            0.0
        }
        fn is_path_pending(&self) -> bool {
            false
        }
        fn is_path_invalid(&self) -> bool {
            self.path_invalid
        }
        fn set_stopped(&mut self, stopped: bool) {
            self.stopped = stopped;
        }
        fn clear_path(&mut self) {
            self.destination = None;
        }
        fn halt(&mut self) {
            self.halted += 1;
            self.stopped = true;
            self.destination = None;
        }
    }

    impl DamageSink for Vec<i32> {
        fn apply_damage(&mut self, amount: i32) {
            self.push(amount);
        }
    }

    struct Targets(HashMap<u32, Vec3>);

    impl TargetLookup<u32> for Targets {
        fn position(&self, target: u32) -> Option<Vec3> {
            self.0.get(&target).copied()
        }
    }

    const TARGET_A: u32 = 1;

    fn three_point_route() -> Vec<Option<Vec3>> {
        vec![
            Some(Vec3::new(0.0, 0.0, 5.0)),
            Some(Vec3::new(5.0, 0.0, 5.0)),
            Some(Vec3::new(5.0, 0.0, 0.0)),
        ]
    }

    fn targets_near() -> Targets {
        Targets(HashMap::from([(TARGET_A, Vec3::new(2.0, 0.0, 0.0))]))
    }

    /// Teleport the fake agent onto its destination, simulating arrival.
    fn arrive(agent: &mut FakeAgent) {
        if let Some(destination) = agent.destination {
            agent.position = destination;
        }
    }

    #[test]
    fn starts_patrolling_towards_first_waypoint() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();

        controller.tick(0.1, &mut agent, &targets_near());

        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.patrol_index(), Some(0));
        assert_eq!(agent.destination, Some(Vec3::new(0.0, 0.0, 5.0)));
        assert_eq!(agent.speed, PatrolChaseConfig::default().patrol_speed);
    }

    #[test]
    fn waits_at_waypoint_then_advances() {
        let config = PatrolChaseConfig {
            patrol_wait_time: 1.0,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::<u32>::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        arrive(&mut agent);
        controller.tick(0.1, &mut agent, &targets);
        assert!(controller.is_waiting());
        assert!(agent.stopped);

        controller.tick(0.5, &mut agent, &targets);
        assert!(controller.is_waiting());
        assert_eq!(controller.patrol_index(), Some(0));

        controller.tick(0.5, &mut agent, &targets);
        assert!(!controller.is_waiting());
        assert!(!agent.stopped);
        assert_eq!(controller.patrol_index(), Some(1));
        assert_eq!(agent.destination, Some(Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn chase_trigger_cancels_wait() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        arrive(&mut agent);
        controller.tick(0.1, &mut agent, &targets);
        assert!(controller.is_waiting());

        controller.notify_interaction_failed(Some(TARGET_A));
        assert!(!controller.is_waiting());

        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(controller.state(), ChaseState::Chasing);
        assert_eq!(controller.chase_target(), Some(TARGET_A));
        assert!(!agent.stopped);
        assert_eq!(agent.speed, PatrolChaseConfig::default().chase_speed);
        assert_eq!(agent.destination, Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn notify_without_target_or_default_is_noop() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();

        controller.notify_interaction_failed(None);
        controller.tick(0.1, &mut agent, &targets_near());

        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.chase_target(), None);
    }

    #[test]
    fn notify_without_target_uses_default() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route())
            .with_default_target(TARGET_A);

        controller.notify_interaction_failed(None);

        assert_eq!(controller.state(), ChaseState::Chasing);
        assert_eq!(controller.chase_target(), Some(TARGET_A));
    }

    #[test]
    fn return_to_patrol_from_any_state() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());

        controller.return_to_patrol();
        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.chase_target(), None);

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.return_to_patrol();
        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.chase_target(), None);
        assert!(!controller.has_caught_target());
    }

    #[test]
    fn repath_is_rate_limited() {
        let config = PatrolChaseConfig {
            chase_repath_interval: 0.5,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let mut targets = targets_near();

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(agent.moves.len(), 1);

        targets.0.insert(TARGET_A, Vec3::new(3.0, 0.0, 0.0));
        controller.tick(0.2, &mut agent, &targets);
        controller.tick(0.2, &mut agent, &targets);
        assert_eq!(agent.moves.len(), 1);

        controller.tick(0.2, &mut agent, &targets);
        assert_eq!(agent.moves.len(), 2);
        assert_eq!(agent.destination, Some(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn lost_target_returns_to_patrol() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &Targets(HashMap::new()));

        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.chase_target(), None);
        // Patrol entry ran in the same tick.
        assert_eq!(agent.destination, Some(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn gives_up_when_target_is_far_on_ground_plane() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let lose = PatrolChaseConfig::default().lose_distance;

        // Far above the enemy: flat distance is small, chase continues.
        let above = Targets(HashMap::from([(TARGET_A, Vec3::new(1.0, lose * 3.0, 0.0))]));
        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &above);
        assert_eq!(controller.state(), ChaseState::Chasing);

        let far = Targets(HashMap::from([(TARGET_A, Vec3::new(lose + 0.5, 0.0, 0.0))]));
        controller.tick(0.1, &mut agent, &far);
        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.chase_target(), None);
    }

    #[test]
    fn keeps_chasing_far_target_when_give_up_disabled() {
        let config = PatrolChaseConfig {
            allow_stop_chase_if_far: false,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let far = Targets(HashMap::from([(TARGET_A, Vec3::new(500.0, 0.0, 0.0))]));

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &far);

        assert_eq!(controller.state(), ChaseState::Chasing);
    }

    #[test]
    fn catch_scenario_damages_once_and_returns_to_patrol() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(controller.state(), ChaseState::Chasing);

        assert!(controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage));
        assert_eq!(damage, vec![PatrolChaseConfig::default().damage_on_catch]);
        assert_eq!(agent.halted, 1);
        assert_eq!(controller.state(), ChaseState::Patrolling);

        assert!(!controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage));
        assert_eq!(damage.len(), 1);
    }

    #[test]
    fn repeated_enter_in_one_episode_damages_once() {
        let config = PatrolChaseConfig {
            stop_after_catch: false,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();
        let targets = targets_near();

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &targets);

        for _ in 0..3 {
            controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage);
            controller.on_catch_zone_exit(TARGET_A);
        }
        assert_eq!(damage.len(), 1);
        assert_eq!(controller.state(), ChaseState::Chasing);

        // Caught enemies stop repathing for the rest of the episode.
        let moves = agent.moves.len();
        controller.tick(1.0, &mut agent, &targets);
        assert_eq!(agent.moves.len(), moves);

        // A new episode re-arms the guard.
        controller.notify_interaction_failed(Some(TARGET_A));
        assert!(controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage));
        assert_eq!(damage.len(), 2);
    }

    #[test]
    fn enter_by_other_entity_does_not_catch() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();

        controller.notify_interaction_failed(Some(TARGET_A));
        assert!(!controller.on_catch_zone_enter(7, &mut agent, &mut damage));
        assert!(controller.is_in_catch_zone());
        assert!(damage.is_empty());

        controller.on_catch_zone_exit(7);
        assert!(!controller.is_in_catch_zone());
        assert_eq!(controller.state(), ChaseState::Chasing);
    }

    #[test]
    fn enter_while_patrolling_does_not_catch() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();

        assert!(!controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage));
        assert!(damage.is_empty());
    }

    #[test]
    fn wrap_skips_invalid_last_entry() {
        for len in 2..8 {
            let mut route: Vec<Option<Vec3>> =
                (0..len).map(|i| Some(Vec3::splat(i as f32))).collect();
            route[len - 1] = None;
            assert_eq!(next_valid_index(&route, len - 1), Some(0), "route length {len}");
        }
    }

    #[test]
    fn next_valid_index_handles_empty_and_all_invalid() {
        assert_eq!(next_valid_index(&[], 0), None);
        assert_eq!(next_valid_index(&[None, None, None], 2), None);
        assert_eq!(next_valid_index(&[None, Some(Vec3::ZERO), None], 2), Some(1));
    }

    #[test]
    fn patrol_skips_invalid_waypoints_in_order() {
        let config = PatrolChaseConfig {
            patrol_wait_time: 0.0,
            ..Default::default()
        };
        let route = vec![
            Some(Vec3::new(0.0, 0.0, 1.0)),
            Some(Vec3::new(0.0, 0.0, 2.0)),
            None,
        ];
        let mut controller = PatrolChaseController::<u32>::new(config, route);
        let mut agent = FakeAgent::default();
        let targets = targets_near();

        let mut visited = Vec::new();
        controller.tick(0.1, &mut agent, &targets);
        for _ in 0..4 {
            visited.push(controller.patrol_index().unwrap());
            arrive(&mut agent);
            controller.tick(0.1, &mut agent, &targets);
            controller.tick(0.1, &mut agent, &targets);
        }
        assert_eq!(visited, vec![0, 1, 0, 1]);
    }

    #[test]
    fn empty_route_is_inert() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), vec![None, None]);
        let mut agent = FakeAgent::default();

        for _ in 0..5 {
            controller.tick(0.5, &mut agent, &targets_near());
        }

        assert_eq!(controller.state(), ChaseState::Patrolling);
        assert_eq!(controller.patrol_index(), None);
        assert!(agent.moves.is_empty());
    }

    #[test]
    fn unreachable_waypoint_is_skipped_without_waiting() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        agent.path_invalid = true;
        controller.tick(0.1, &mut agent, &targets);

        assert!(!controller.is_waiting());
        assert_eq!(controller.patrol_index(), Some(1));
        assert_eq!(agent.destination, Some(Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn rejected_waypoint_moves_cursor_forward() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent {
            reject_moves: true,
            ..Default::default()
        };
        let targets = targets_near();

        // Entry and the patrol step each try one waypoint.
        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(controller.patrol_index(), Some(2));
        assert!(agent.moves.is_empty());

        agent.reject_moves = false;
        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(agent.destination, Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn off_surface_agent_is_warped_before_moving() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent {
            off_surface: true,
            recoverable: true,
            position: Vec3::new(0.0, 3.0, 0.0),
            ..Default::default()
        };

        controller.tick(0.1, &mut agent, &targets_near());

        assert!(!agent.off_surface);
        assert_eq!(agent.destination, Some(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn unrecoverable_agent_skips_move_and_retries() {
        let mut controller =
            PatrolChaseController::<u32>::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent {
            off_surface: true,
            ..Default::default()
        };
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        controller.tick(0.1, &mut agent, &targets);
        assert!(agent.moves.is_empty());
        assert_eq!(controller.patrol_index(), Some(0));

        agent.off_surface = false;
        controller.tick(0.1, &mut agent, &targets);
        assert_eq!(agent.moves, vec![Vec3::new(0.0, 0.0, 5.0)]);
    }

    #[test]
    fn exactly_one_state_through_random_events() {
        let mut controller =
            PatrolChaseController::new(PatrolChaseConfig::default(), three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();
        let mut targets = targets_near();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            match rng.gen_range(0..6) {
                0 => controller.notify_interaction_failed(Some(TARGET_A)),
                1 => controller.notify_interaction_failed(None),
                2 => {
                    controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage);
                }
                3 => controller.return_to_patrol(),
                4 => {
                    if targets.0.remove(&TARGET_A).is_none() {
                        targets.0.insert(TARGET_A, Vec3::new(2.0, 0.0, 0.0));
                    }
                }
                _ => arrive(&mut agent),
            }
            controller.tick(rng.gen_range(0.0..0.5), &mut agent, &targets);

            match controller.state() {
                ChaseState::Chasing => assert!(controller.chase_target().is_some()),
                ChaseState::Patrolling => assert!(controller.chase_target().is_none()),
            }
        }
    }

    #[test]
    fn invalid_wait_time_skips_the_wait() {
        for wait in [-1.0, f32::NAN, f32::INFINITY] {
            let config = PatrolChaseConfig {
                patrol_wait_time: wait,
                ..Default::default()
            };
            let mut controller = PatrolChaseController::<u32>::new(config, three_point_route());
            let mut agent = FakeAgent::default();
            let targets = targets_near();

            controller.tick(0.1, &mut agent, &targets);
            arrive(&mut agent);
            controller.tick(0.1, &mut agent, &targets);
            controller.tick(0.1, &mut agent, &targets);

            assert_eq!(controller.patrol_index(), Some(1), "wait time {wait}");
            assert_eq!(agent.destination, Some(Vec3::new(5.0, 0.0, 5.0)));
        }
    }

    #[test]
    fn non_finite_dt_does_not_advance_the_wait() {
        let config = PatrolChaseConfig {
            patrol_wait_time: 1.0,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::<u32>::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let targets = targets_near();

        controller.tick(0.1, &mut agent, &targets);
        arrive(&mut agent);
        controller.tick(0.1, &mut agent, &targets);
        assert!(controller.is_waiting());

        for dt in [f32::INFINITY, f32::NAN, -5.0] {
            controller.tick(dt, &mut agent, &targets);
            assert!(controller.is_waiting(), "dt {dt}");
        }

        controller.tick(1.0, &mut agent, &targets);
        assert!(!controller.is_waiting());
        assert_eq!(controller.patrol_index(), Some(1));
    }

    #[test]
    fn new_episode_after_catch_resumes_movement() {
        let config = PatrolChaseConfig {
            stop_after_catch: false,
            ..Default::default()
        };
        let mut controller = PatrolChaseController::new(config, three_point_route());
        let mut agent = FakeAgent::default();
        let mut damage = Vec::new();
        let targets = targets_near();

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &targets);
        assert!(controller.on_catch_zone_enter(TARGET_A, &mut agent, &mut damage));
        assert!(agent.stopped);
        assert_eq!(agent.destination, None);

        controller.notify_interaction_failed(Some(TARGET_A));
        controller.tick(0.1, &mut agent, &targets);

        assert_eq!(controller.state(), ChaseState::Chasing);
        assert!(!agent.stopped);
        assert_eq!(agent.destination, Some(Vec3::new(2.0, 0.0, 0.0)));
    }
}
