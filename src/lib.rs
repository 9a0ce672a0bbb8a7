//! Quantum Sandbox - A 2D physics playground with an adaptive AI player
//!
//! Core modules:
//! - `sim`: Deterministic simulation (force model, strategy controller, game state)
//! - `settings`: User-tunable configuration
//! - `web`: wasm-bindgen facade for the browser UI layer

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{RadiusBreathing, Settings};

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Gravitational constant
    pub const G: f64 = 6.674e-11;
    /// Coulomb's constant
    pub const K: f64 = 8.99e9;
    /// Distance floor for the inverse-square laws
    pub const MIN_DISTANCE: f64 = 1e-10;

    /// Chance per tick per body of a tunneling jump
    pub const TUNNEL_PROBABILITY: f64 = 0.01;
    /// Tunneling offset range (each axis drawn from [-TUNNEL_RANGE, TUNNEL_RANGE])
    pub const TUNNEL_RANGE: f64 = 25.0;
    /// Magnitude of the spin-orbit force
    pub const SPIN_ORBIT_FORCE: f64 = 0.1;
    /// Scale of the charge/spin driven force
    pub const PROPERTY_FORCE_SCALE: f64 = 0.1;

    /// Phase advance per tick for the 4th dimension
    pub const PHASE_STEP: f64 = 0.01;
    /// Amplitude of the w coordinate
    pub const WOBBLE_AMPLITUDE: f64 = 0.5;
    /// Amplitude of the radius breathing
    pub const BREATHING_AMPLITUDE: f64 = 0.1;

    /// Radius of freshly spawned bodies
    pub const SPAWN_RADIUS: f64 = 20.0;
    /// Bodies at or below this radius cannot split
    pub const SPLIT_MIN_RADIUS: f64 = 10.0;
    /// Offset of split children from the parent center (both axes)
    pub const SPLIT_OFFSET: f64 = 5.0;

    /// Velocity multipliers for accelerate/decelerate
    pub const ACCELERATE_FACTOR: f64 = 1.5;
    pub const DECELERATE_FACTOR: f64 = 0.5;
    /// Orientation change of the rotate action
    pub const ROTATE_STEP: f64 = std::f64::consts::FRAC_PI_4;

    /// Score awarded on level completion
    pub const LEVEL_UP_BONUS: u64 = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_vec_quarter_turn() {
        let v = rotate_vec(DVec2::new(1.0, 0.0), PI / 2.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }
}
