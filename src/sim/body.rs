//! Simulated bodies
//!
//! A body is a circle in the plane carrying the scalar properties the force
//! model reads (mass, charge, spin) plus a phase accumulator for the
//! cosmetic 4th dimension.

use std::fmt;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable body identifier (never reused within a world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fill colour used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
        }
    }

    /// CSS hex form, e.g. `#1A2B3C`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Physical properties read by the force model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProperties {
    /// Always > 0
    pub mass: f64,
    /// In [-1, 1]
    pub charge: f64,
    /// Radians
    pub spin: f64,
}

impl BodyProperties {
    /// Draw mass in [1, 11), charge in [-1, 1), spin in [0, 2π)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            mass: rng.random_range(1.0..11.0),
            charge: rng.random_range(-1.0..1.0),
            spin: rng.random_range(0.0..std::f64::consts::TAU),
        }
    }
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            charge: 0.0,
            spin: 0.0,
        }
    }
}

/// A circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Force accumulated during the current tick (cleared on integration)
    pub force: DVec2,
    /// Current (visual) radius
    pub radius: f64,
    /// Radius the breathing effect oscillates around
    pub base_radius: f64,
    /// Orientation in radians
    pub angle: f64,
    pub properties: BodyProperties,
    /// 4th dimension phase accumulator
    pub phase: f64,
    pub fill: Color,
}

impl Body {
    pub fn new(id: BodyId, pos: DVec2, radius: f64, properties: BodyProperties) -> Self {
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            force: DVec2::ZERO,
            radius,
            base_radius: radius,
            angle: 0.0,
            properties,
            phase: 0.0,
            fill: Color::new(0x88, 0x88, 0x88),
        }
    }

    /// Accumulate a force for this tick
    #[inline]
    pub fn apply_force(&mut self, force: DVec2) {
        self.force += force;
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        self.pos.distance(other.pos)
    }

    /// Point containment (used by the UI for picking)
    pub fn contains_point(&self, point: DVec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }
}
