//! Force model
//!
//! Once per tick every unordered pair of bodies exchanges a gravitational and
//! an electrostatic force (equal and opposite), then each body receives its
//! own perturbations: tunneling, spin-orbit push, the 4D wobble and the
//! charge/spin driven force.
//!
//! Pairwise forces are computed from the positions at the start of the tick,
//! so the iteration order only affects floating-point summation order.

use glam::DVec2;
use rand::Rng;

use super::body::Body;
use crate::consts::*;
use crate::rotate_vec;
use crate::settings::RadiusBreathing;

/// Inverse-square force on a body at `from` due to a body at `to`.
/// Positive `coupling` pulls toward `to`.
#[inline]
fn inverse_square(from: DVec2, to: DVec2, coupling: f64) -> DVec2 {
    let delta = to - from;
    let distance = delta.length().max(MIN_DISTANCE);
    delta.normalize_or_zero() * (coupling / (distance * distance))
}

/// Gravitational force on `a` due to `b` (always attractive)
pub fn gravitational_force(a: &Body, b: &Body) -> DVec2 {
    inverse_square(a.pos, b.pos, G * a.properties.mass * b.properties.mass)
}

/// Coulomb force on `a` due to `b`: like charges repel, opposite charges attract
pub fn charge_force(a: &Body, b: &Body) -> DVec2 {
    -inverse_square(a.pos, b.pos, K * a.properties.charge * b.properties.charge)
}

/// Constant-magnitude push along the body's spin direction
pub fn spin_orbit_force(body: &Body) -> DVec2 {
    rotate_vec(DVec2::new(SPIN_ORBIT_FORCE, 0.0), body.properties.spin)
}

/// Force from charge and spin: charge·(cos spin, sin spin)·scale
pub fn property_force(body: &Body) -> DVec2 {
    let p = &body.properties;
    DVec2::new(p.spin.cos(), p.spin.sin()) * (p.charge * PROPERTY_FORCE_SCALE)
}

/// Per-tick force model
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceModel {
    pub breathing: RadiusBreathing,
}

impl ForceModel {
    pub fn new(breathing: RadiusBreathing) -> Self {
        Self { breathing }
    }

    /// Accumulate this tick's forces and apply the per-body position effects
    pub fn compute_step<R: Rng + ?Sized>(&self, bodies: &mut [Body], rng: &mut R) {
        if bodies.is_empty() {
            return;
        }

        let forces = pairwise_forces(bodies);
        for (body, force) in bodies.iter_mut().zip(forces) {
            body.apply_force(force);
        }

        for body in bodies.iter_mut() {
            tunnel(body, rng);
            body.apply_force(spin_orbit_force(body));
            self.advance_fourth_dimension(body);
            body.apply_force(property_force(body));
        }
    }

    /// Advance the phase, drift the position along the projected 4D rotation,
    /// and breathe the radius.
    pub fn advance_fourth_dimension(&self, body: &mut Body) {
        body.phase += PHASE_STEP;
        let (sin, cos) = body.phase.sin_cos();
        let w = WOBBLE_AMPLITUDE * sin;
        body.pos += DVec2::new(w * cos, w * sin);

        let scale = 1.0 + BREATHING_AMPLITUDE * sin;
        body.radius = match self.breathing {
            RadiusBreathing::Relative => body.base_radius * scale,
            RadiusBreathing::Compounding {
                min_radius,
                max_radius,
            } => (body.radius * scale).max(min_radius).min(max_radius),
        };
    }
}

/// Net pairwise (gravity + charge) force per body, from a single position snapshot
pub fn pairwise_forces(bodies: &[Body]) -> Vec<DVec2> {
    let mut forces = vec![DVec2::ZERO; bodies.len()];
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            let force = gravitational_force(a, b) + charge_force(a, b);
            forces[i] += force;
            forces[j] -= force;
        }
    }
    forces
}

/// With probability TUNNEL_PROBABILITY, jump by an independent offset per axis
fn tunnel<R: Rng + ?Sized>(body: &mut Body, rng: &mut R) {
    if rng.random::<f64>() < TUNNEL_PROBABILITY {
        let offset = DVec2::new(
            rng.random_range(-TUNNEL_RANGE..=TUNNEL_RANGE),
            rng.random_range(-TUNNEL_RANGE..=TUNNEL_RANGE),
        );
        body.pos += offset;
        log::trace!("{} tunneled by ({:.1}, {:.1})", body.id, offset.x, offset.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyId, BodyProperties};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn body(id: u32, x: f64, y: f64, mass: f64, charge: f64) -> Body {
        Body::new(
            BodyId(id),
            DVec2::new(x, y),
            20.0,
            BodyProperties {
                mass,
                charge,
                spin: 0.0,
            },
        )
    }

    #[test]
    fn test_gravity_attracts() {
        let a = body(1, 0.0, 0.0, 5.0, 0.0);
        let b = body(2, 10.0, 0.0, 2.0, 0.0);
        let f = gravitational_force(&a, &b);
        assert!(f.x > 0.0);
        assert!((f.x - G * 10.0 / 100.0).abs() < 1e-20);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_like_charges_repel() {
        let a = body(1, 0.0, 0.0, 1.0, 0.5);
        let b = body(2, 10.0, 0.0, 1.0, 0.5);
        let f = charge_force(&a, &b);
        assert!(f.x < 0.0);
        assert!((f.x + K * 0.25 / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_charges_attract() {
        let a = body(1, 0.0, 0.0, 1.0, 0.5);
        let b = body(2, 0.0, 10.0, 1.0, -0.5);
        assert!(charge_force(&a, &b).y > 0.0);
    }

    #[test]
    fn test_coincident_bodies_are_finite() {
        let a = body(1, 3.0, 3.0, 1.0, 1.0);
        let b = body(2, 3.0, 3.0, 1.0, 1.0);
        let forces = pairwise_forces(&[a, b]);
        assert!(forces.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_pairwise_forces_sum_to_zero() {
        let bodies = vec![
            body(1, 0.0, 0.0, 3.0, 0.2),
            body(2, 40.0, 10.0, 7.0, -0.9),
            body(3, -25.0, 60.0, 1.5, 0.4),
            body(4, 90.0, -30.0, 10.0, -0.1),
        ];
        let total: DVec2 = pairwise_forces(&bodies).into_iter().sum();
        assert!(total.length() < 1e-3, "net internal force {total:?}");
    }

    #[test]
    fn test_pairwise_forces_order_independent() {
        let bodies = vec![
            body(1, 0.0, 0.0, 3.0, 0.2),
            body(2, 40.0, 10.0, 7.0, -0.9),
            body(3, -25.0, 60.0, 1.5, 0.4),
        ];
        let reversed: Vec<Body> = bodies.iter().rev().cloned().collect();
        let forward = pairwise_forces(&bodies);
        let backward = pairwise_forces(&reversed);
        for (i, f) in forward.iter().enumerate() {
            let g = backward[bodies.len() - 1 - i];
            assert!((*f - g).length() <= 1e-9 * f.length().max(1.0));
        }
    }

    #[test]
    fn test_spin_orbit_and_property_force() {
        let mut b = body(1, 0.0, 0.0, 1.0, 0.5);
        b.properties.spin = std::f64::consts::FRAC_PI_2;
        let spin = spin_orbit_force(&b);
        assert!(spin.x.abs() < 1e-12);
        assert!((spin.y - 0.1).abs() < 1e-12);

        let prop = property_force(&b);
        assert!(prop.x.abs() < 1e-12);
        assert!((prop.y - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_fourth_dimension_wobble() {
        let model = ForceModel::default();
        let mut b = body(1, 100.0, 100.0, 1.0, 0.0);
        b.phase = 1.0;
        model.advance_fourth_dimension(&mut b);

        let phase: f64 = 1.01;
        let w = 0.5 * phase.sin();
        assert!((b.phase - phase).abs() < 1e-12);
        assert!((b.pos.x - (100.0 + w * phase.cos())).abs() < 1e-12);
        assert!((b.pos.y - (100.0 + w * phase.sin())).abs() < 1e-12);
        assert!((b.radius - 20.0 * (1.0 + 0.1 * phase.sin())).abs() < 1e-12);
    }

    #[test]
    fn test_relative_breathing_does_not_drift() {
        let model = ForceModel::new(RadiusBreathing::Relative);
        let mut b = body(1, 0.0, 0.0, 1.0, 0.0);
        for _ in 0..10_000 {
            model.advance_fourth_dimension(&mut b);
        }
        assert!(b.radius >= 20.0 * 0.9 - 1e-9 && b.radius <= 20.0 * 1.1 + 1e-9);
    }

    #[test]
    fn test_compounding_breathing_is_clamped() {
        let model = ForceModel::new(RadiusBreathing::Compounding {
            min_radius: 5.0,
            max_radius: 60.0,
        });
        let mut b = body(1, 0.0, 0.0, 1.0, 0.0);
        for _ in 0..1_000 {
            model.advance_fourth_dimension(&mut b);
            assert!((5.0..=60.0).contains(&b.radius));
        }
    }

    #[test]
    fn test_compute_step_with_repaired_reversed_bounds() {
        let json = r#"{ "breathing": { "Compounding": { "min_radius": 80.0, "max_radius": 4.0 } } }"#;
        let settings = crate::Settings::from_json(json).unwrap();
        let model = ForceModel::new(settings.breathing);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut bodies = vec![body(1, 0.0, 0.0, 2.0, 0.3), body(2, 200.0, 50.0, 4.0, -0.6)];
        for _ in 0..1_000 {
            model.compute_step(&mut bodies, &mut rng);
            for b in &bodies {
                assert!((4.0..=80.0).contains(&b.radius), "radius {}", b.radius);
            }
        }
    }

    #[test]
    fn test_compounding_never_panics_on_reversed_bounds() {
        let model = ForceModel::new(RadiusBreathing::Compounding {
            min_radius: 80.0,
            max_radius: 4.0,
        });
        let mut b = body(1, 0.0, 0.0, 1.0, 0.0);
        model.advance_fourth_dimension(&mut b);
        assert!(b.radius.is_finite());
    }

    #[test]
    fn test_compute_step_empty_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bodies: Vec<Body> = Vec::new();
        ForceModel::default().compute_step(&mut bodies, &mut rng);
        assert!(bodies.is_empty());
    }

    #[test]
    fn test_compute_step_single_body_gets_local_forces() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = body(1, 0.0, 0.0, 1.0, 1.0);
        b.properties.spin = 0.0;
        let mut bodies = vec![b];
        ForceModel::default().compute_step(&mut bodies, &mut rng);
        // spin-orbit 0.1 plus property 1.0 * 0.1, both along +x
        assert!((bodies[0].force.x - 0.2).abs() < 1e-12);
        assert!(bodies[0].force.y.abs() < 1e-12);
    }

    #[test]
    fn test_tunneling_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut jumps = 0;
        for _ in 0..5_000 {
            let mut b = body(1, 0.0, 0.0, 1.0, 0.0);
            tunnel(&mut b, &mut rng);
            if b.pos != DVec2::ZERO {
                jumps += 1;
                assert!(b.pos.x.abs() <= TUNNEL_RANGE && b.pos.y.abs() <= TUNNEL_RANGE);
            }
        }
        // ~1% of 5000
        assert!((10..=120).contains(&jumps), "jumps = {jumps}");
    }

    proptest! {
        #[test]
        fn prop_newtons_third_law(
            ax in -500.0f64..500.0, ay in -500.0f64..500.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
            ma in 1.0f64..11.0, mb in 1.0f64..11.0,
            qa in -1.0f64..1.0, qb in -1.0f64..1.0,
        ) {
            prop_assume!(DVec2::new(ax, ay).distance(DVec2::new(bx, by)) > 1e-3);
            let a = body(1, ax, ay, ma, qa);
            let b = body(2, bx, by, mb, qb);

            let (gab, gba) = (gravitational_force(&a, &b), gravitational_force(&b, &a));
            prop_assert!((gab + gba).length() <= 1e-12 * gab.length().max(1e-300));

            let (cab, cba) = (charge_force(&a, &b), charge_force(&b, &a));
            prop_assert!((cab + cba).length() <= 1e-12 * cab.length().max(1e-300));
        }

        #[test]
        fn prop_gravity_decreases_with_distance(
            d in 1.0f64..1_000.0,
            extra in 0.1f64..1_000.0,
            ma in 1.0f64..11.0, mb in 1.0f64..11.0,
        ) {
            let a = body(1, 0.0, 0.0, ma, 0.0);
            let near = body(2, d, 0.0, mb, 0.0);
            let far = body(3, d + extra, 0.0, mb, 0.0);
            prop_assert!(
                gravitational_force(&a, &near).length() > gravitational_force(&a, &far).length()
            );
        }
    }
}
