//! Enemies module - patrol/chase AI, movement and spawning.

pub mod agent;
mod ai;
mod components;
pub mod data;
pub mod fsm;
mod plugin;
mod spawning;

pub use agent::SteeringAgent;
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry, PatrolChaseConfig};
pub use fsm::{ChaseState, DamageSink, NavAgent, PatrolChaseController, TargetLookup};
pub use plugin::EnemyPlugin;
pub use spawning::spawn_enemy;
