//! Straight-line steering over the walkable area.
//!
//! `SteeringAgent` is the navigation provider the patrol/chase controller
//! drives. It has no path planner: destinations are reached in a straight
//! line on the ground plane, and a path is invalid once its destination
//! falls outside the walkable area.

use bevy::prelude::*;

use super::fsm::{flat_distance_squared, NavAgent};
use crate::world::WalkableArea;

/// Movement state for an enemy.
#[derive(Component, Debug, Clone)]
pub struct SteeringAgent {
    pub destination: Option<Vec3>,
    /// Units per second
    pub speed: f32,
    /// Distance at which the agent considers itself arrived
    pub stopping_distance: f32,
    pub stopped: bool,
    /// Velocity applied last frame
    pub velocity: Vec3,
}

impl Default for SteeringAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 2.5,
            stopping_distance: 0.2,
            stopped: false,
            velocity: Vec3::ZERO,
        }
    }
}

/// Borrowed view of one enemy's movement state, exposed as a [`NavAgent`].
pub struct AgentView<'a> {
    pub transform: &'a mut Transform,
    pub agent: &'a mut SteeringAgent,
    pub area: &'a WalkableArea,
}

impl NavAgent for AgentView<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn is_on_surface(&self) -> bool {
        self.area.contains(self.transform.translation)
    }

    fn sample_surface(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        self.area.sample(point, radius)
    }

    fn warp(&mut self, point: Vec3) {
        self.transform.translation = point;
        self.agent.velocity = Vec3::ZERO;
    }

    fn move_to(&mut self, point: Vec3) -> bool {
        if !self.area.contains(point) {
            return false;
        }
        self.agent.destination = Some(point);
        true
    }

    fn set_speed(&mut self, speed: f32) {
        self.agent.speed = speed;
    }

    fn remaining_distance(&self) -> f32 {
        self.agent
            .destination
            .map(|destination| {
                flat_distance_squared(self.transform.translation, destination).sqrt()
            })
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.agent.stopping_distance
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn is_path_invalid(&self) -> bool {
        self.agent
            .destination
            .is_some_and(|destination| !self.area.contains(destination))
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.agent.stopped = stopped;
        if stopped {
            self.agent.velocity = Vec3::ZERO;
        }
    }

    fn clear_path(&mut self) {
        self.agent.destination = None;
    }

    fn halt(&mut self) {
        self.agent.stopped = true;
        self.agent.velocity = Vec3::ZERO;
        self.agent.destination = None;
    }
}

/// Move agents toward their destinations and face the direction of travel.
pub fn steer_agents(time: Res<Time>, mut query: Query<(&mut Transform, &mut SteeringAgent)>) {
    let dt = time.delta_secs();

    for (mut transform, mut agent) in query.iter_mut() {
        let Some(destination) = agent.destination else {
            agent.velocity = Vec3::ZERO;
            continue;
        };
        if agent.stopped {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        // Horizontal only
        let offset = Vec3::new(
            destination.x - transform.translation.x,
            0.0,
            destination.z - transform.translation.z,
        );
        let distance = offset.length();

        if distance <= agent.stopping_distance {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        // Don't overshoot the stopping ring
        let step = (agent.speed * dt).min(distance - agent.stopping_distance);
        let direction = offset / distance;
        transform.translation += direction * step;
        agent.velocity = if dt > 0.0 { direction * (step / dt) } else { Vec3::ZERO };

        let look_target = Vec3::new(destination.x, transform.translation.y, destination.z);
        transform.look_at(look_target, Vec3::Y);
    }
}
