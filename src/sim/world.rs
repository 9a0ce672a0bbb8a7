//! Body collection and rigid-body engine stand-in
//!
//! Owns the active body set, hands out ids, keeps the entanglement index in
//! sync with removals, and integrates accumulated forces each tick. Collision
//! resolution is not modelled.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyProperties, Color};
use super::entangle::EntanglementIndex;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Arena extent (bodies spawn inside [0, width) x [0, height))
    pub width: f64,
    pub height: f64,
    /// Active bodies (sorted by id for determinism)
    bodies: Vec<Body>,
    entanglement: EntanglementIndex,
    next_id: u32,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            bodies: Vec::new(),
            entanglement: EntanglementIndex::new(),
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn entanglement(&self) -> &EntanglementIndex {
        &self.entanglement
    }

    /// Add a body with explicit properties
    pub fn create_body(
        &mut self,
        pos: DVec2,
        radius: f64,
        properties: BodyProperties,
        fill: Color,
    ) -> BodyId {
        let id = self.next_body_id();
        let mut body = Body::new(id, pos, radius, properties);
        body.fill = fill;
        self.bodies.push(body);
        id
    }

    /// Add a body at `pos` with random properties, colour and phase
    pub fn create_random_body<R: Rng + ?Sized>(
        &mut self,
        pos: DVec2,
        radius: f64,
        rng: &mut R,
    ) -> BodyId {
        let properties = BodyProperties::random(rng);
        let fill = Color::random(rng);
        let phase = rng.random_range(0.0..std::f64::consts::TAU);
        let id = self.create_body(pos, radius, properties, fill);
        if let Some(body) = self.get_mut(id) {
            body.phase = phase;
        }
        id
    }

    /// Remove a body, dissolving its entanglement
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.bodies.iter().position(|b| b.id == id)?;
        self.entanglement.release(id);
        Some(self.bodies.remove(idx))
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.entanglement.clear();
    }

    /// Pair two live bodies. Returns false if either is missing or they are the same body.
    pub fn entangle(&mut self, a: BodyId, b: BodyId) -> bool {
        if a == b || self.get(a).is_none() || self.get(b).is_none() {
            return false;
        }
        self.entanglement.entangle(a, b);
        true
    }

    pub fn partner(&self, id: BodyId) -> Option<BodyId> {
        self.entanglement.partner(id)
    }

    /// Clear the world and spawn `count` random bodies, entangling consecutive pairs
    pub fn populate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.clear();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = DVec2::new(
                rng.random_range(0.0..self.width.max(1.0)),
                rng.random_range(0.0..self.height.max(1.0)),
            );
            ids.push(self.create_random_body(pos, SPAWN_RADIUS, rng));
        }
        for pair in ids.chunks_exact(2) {
            self.entanglement.entangle(pair[0], pair[1]);
        }
        log::info!(
            "Created {} bodies ({} entangled pairs)",
            self.bodies.len(),
            self.entanglement.len()
        );
        for (a, b) in self.entanglement.pairs() {
            log::debug!("Entangled {} with {}", a, b);
        }
    }

    /// Closest other body by Euclidean distance; ties go to the first in iteration order
    pub fn nearest(&self, id: BodyId) -> Option<BodyId> {
        let origin = self.get(id)?;
        let mut nearest = None;
        let mut min_distance = f64::INFINITY;
        for other in self.bodies.iter().filter(|b| b.id != id) {
            let distance = origin.distance_to(other);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(other.id);
            }
        }
        nearest
    }

    /// First body containing `point`
    pub fn query_point(&self, point: DVec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|b| b.contains_point(point))
            .map(|b| b.id)
    }

    /// Replace a body with two children of radius r/√2, offset ±SPLIT_OFFSET on both axes.
    /// Returns None (and changes nothing) if the body is missing or too small.
    pub fn split(&mut self, id: BodyId) -> Option<(BodyId, BodyId)> {
        let parent = self.get(id)?;
        if parent.radius <= SPLIT_MIN_RADIUS {
            return None;
        }
        let parent = self.remove(id)?;

        let scale = std::f64::consts::FRAC_1_SQRT_2;
        let properties = BodyProperties {
            mass: parent.properties.mass * 0.5,
            ..parent.properties
        };
        let offset = DVec2::splat(SPLIT_OFFSET);

        let mut spawn = |pos: DVec2| {
            let child_id = self.next_body_id();
            let mut child = Body::new(child_id, pos, parent.radius * scale, properties);
            child.base_radius = parent.base_radius * scale;
            child.vel = parent.vel;
            child.angle = parent.angle;
            child.phase = parent.phase;
            child.fill = parent.fill;
            self.bodies.push(child);
            child_id
        };
        let first = spawn(parent.pos - offset);
        let second = spawn(parent.pos + offset);

        log::debug!("Split {} into {} and {}", id, first, second);
        Some((first, second))
    }

    /// Advance positions from accumulated forces, then clear the accumulators
    pub fn integrate(&mut self, dt: f64, max_speed: f64) {
        for body in &mut self.bodies {
            body.vel += body.force / body.properties.mass * dt;
            let speed = body.vel.length();
            if speed > max_speed {
                body.vel = body.vel.normalize_or_zero() * max_speed;
            }
            body.pos += body.vel * dt;
            body.force = DVec2::ZERO;
        }
    }

    /// Ensure bodies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
    }
}
