//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod entangle;
pub mod forces;
pub mod level;
pub mod state;
pub mod strategy;
pub mod tick;
pub mod world;

pub use body::{Body, BodyId, BodyProperties, Color};
pub use entangle::EntanglementIndex;
pub use forces::{ForceModel, charge_force, gravitational_force, pairwise_forces};
pub use level::{Level, default_levels};
pub use state::{GameEvent, GameMode, SimulationContext, Trigger};
pub use strategy::{
    Action, ActionKind, ExploitPolicy, InteractionHook, PerformanceEvaluator, StrategyController,
    StrategyLabel, StrategyState, explore_random_action,
};
pub use tick::{check_objectives, update_game};
pub use world::World;
