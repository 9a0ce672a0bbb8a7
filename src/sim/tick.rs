//! Frame tick
//!
//! One call per rendered frame: strategy controller (single mode only), then
//! the force model and integration, then the objective check.

use super::state::{GameEvent, GameMode, SimulationContext};
use super::strategy::Action;
use crate::consts::LEVEL_UP_BONUS;

/// Advance the session by one tick. Returns the controller's action, if any.
pub fn update_game(ctx: &mut SimulationContext) -> Option<Action> {
    if ctx.paused {
        return None;
    }

    let action = match ctx.mode {
        GameMode::Single => ctx.controller.run(&mut ctx.world, &mut ctx.rng),
        // Multiplayer input is handled by the UI layer
        GameMode::Multi => None,
    };

    ctx.forces.compute_step(ctx.world.bodies_mut(), &mut ctx.rng);
    ctx.world.integrate(ctx.settings.dt, ctx.settings.max_speed);
    ctx.world.normalize_order();
    ctx.time_ticks += 1;

    check_objectives(ctx);
    action
}

/// Level up once at most one body remains. Returns true on level up.
///
/// A level that spawns no bodies has nothing to clear and never advances.
pub fn check_objectives(ctx: &mut SimulationContext) -> bool {
    let spawns_bodies = ctx.current_level().is_some_and(|l| l.object_count > 0);
    if spawns_bodies && ctx.world.len() <= 1 {
        level_up(ctx);
        true
    } else {
        false
    }
}

fn level_up(ctx: &mut SimulationContext) {
    ctx.score += LEVEL_UP_BONUS;
    ctx.set_level(ctx.level + 1);
    let event = GameEvent::LevelUp {
        level: ctx.level,
        score: ctx.score,
    };
    ctx.push_event(event);
}
