//! Per-frame interpolation between the formed and scattered endpoints.
//!
//! [`advance`] runs once per population per frame: it eases the blend
//! factor toward the target implied by the current mode, then rewrites the
//! population's render buffer from the cached endpoints. Pure arithmetic
//! over pre-allocated buffers; nothing here allocates or blocks.

use crate::instance::Population;
use crate::state::Mode;
use glam::Vec3;

/// Below this factor the drift term is cut entirely, so a formed tree is
/// pixel-stable instead of shimmering.
pub const DRIFT_THRESHOLD: f32 = 0.05;

/// Advance one population by `delta` seconds.
///
/// Drift is an oscillation with a per-instance phase so elements
/// desynchronize, enveloped by `factor * (1 - factor) * 4`: it swells
/// through the transition and dies off at both endpoints, which keeps the
/// hard guarantee that a factor of exactly 0 or 1 reproduces the cached
/// endpoint transform bit for bit.
pub fn advance(population: &mut Population, mode: Mode, elapsed: f32, delta: f32) {
    let rate = population.kind().blend_rate();
    let drift_amplitude = population.kind().drift_amplitude();
    let (instances, blend, raw) = population.parts_mut();

    blend.set_target(mode);
    let factor = blend.advance(delta, rate);

    let envelope = if factor > DRIFT_THRESHOLD {
        drift_amplitude * factor * (1.0 - factor) * 4.0
    } else {
        0.0
    };

    for (instance, out) in instances.iter().zip(raw.iter_mut()) {
        // At the exact endpoints, reproduce the cached transform rather
        // than trusting lerp/slerp rounding.
        if factor == 0.0 {
            out.position = instance.formed_position.to_array();
            out.rotation = instance.formed_rotation.to_array();
            continue;
        }
        if factor == 1.0 {
            out.position = instance.scattered_position.to_array();
            out.rotation = instance.scattered_rotation.to_array();
            continue;
        }

        let mut position = instance
            .formed_position
            .lerp(instance.scattered_position, factor);

        if envelope > 0.0 {
            // Per-instance phase splits both the offset and the speed.
            let speed = 0.5 + instance.phase * 0.15;
            let swirl = (elapsed * speed + instance.phase).sin() * envelope;
            let sway = (elapsed * 0.5 + instance.phase).cos() * envelope;
            position += Vec3::new(sway, swirl, swirl * 0.5);
        }

        let rotation = instance
            .formed_rotation
            .slerp(instance.scattered_rotation, factor);

        out.position = position.to_array();
        out.rotation = rotation.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Population, TreeConfig};
    use crate::shape::ShapeContext;

    fn small_population() -> Population {
        let config = TreeConfig {
            ornament_count: 50,
            ..TreeConfig::default()
        };
        let mut ctx = ShapeContext::from_seed(21);
        Population::ornaments(&mut ctx, &config)
    }

    #[test]
    fn test_factor_zero_is_exact_formed_endpoint() {
        let mut pop = small_population();
        // A formed tree after arbitrary elapsed time shows zero drift.
        advance(&mut pop, Mode::Formed, 123.456, 1.0 / 60.0);
        for (instance, raw) in pop.instances().iter().zip(pop.raw()) {
            assert_eq!(raw.position, instance.formed_position.to_array());
            assert_eq!(raw.rotation, instance.formed_rotation.to_array());
        }
    }

    #[test]
    fn test_factor_one_is_exact_scattered_endpoint() {
        let mut pop = small_population();
        pop.blend_mut().set_factor(1.0);
        // Zero delta keeps the factor pinned at exactly 1.
        advance(&mut pop, Mode::Chaos, 77.7, 0.0);
        for (instance, raw) in pop.instances().iter().zip(pop.raw()) {
            assert_eq!(raw.position, instance.scattered_position.to_array());
            assert_eq!(raw.rotation, instance.scattered_rotation.to_array());
        }
    }

    #[test]
    fn test_midway_positions_between_endpoints() {
        let mut pop = small_population();
        pop.blend_mut().set_factor(0.5);
        advance(&mut pop, Mode::Chaos, 0.0, 0.0);
        for (instance, raw) in pop.instances().iter().zip(pop.raw()) {
            let expected = instance
                .formed_position
                .lerp(instance.scattered_position, 0.5);
            let got = Vec3::from_array(raw.position);
            // Within the drift envelope of the midpoint.
            let max_drift = pop.kind().drift_amplitude() * 2.0;
            assert!((got - expected).length() <= max_drift + 1e-4);
        }
    }

    #[test]
    fn test_drift_gated_below_threshold() {
        let mut pop = small_population();
        pop.blend_mut().set_factor(0.03);
        advance(&mut pop, Mode::Formed, 42.0, 0.0);
        for (instance, raw) in pop.instances().iter().zip(pop.raw()) {
            let expected = instance
                .formed_position
                .lerp(instance.scattered_position, 0.03);
            assert_eq!(raw.position, expected.to_array());
        }
    }

    #[test]
    fn test_drift_moves_midway_instances() {
        let mut pop = small_population();
        pop.blend_mut().set_factor(0.5);
        advance(&mut pop, Mode::Chaos, 1.0, 0.0);
        let first: Vec<[f32; 3]> = pop.raw().iter().map(|r| r.position).collect();
        advance(&mut pop, Mode::Chaos, 2.0, 0.0);
        let moved = pop
            .raw()
            .iter()
            .zip(&first)
            .filter(|(r, f)| r.position != **f)
            .count();
        assert!(moved > 40, "only {moved} of 50 drifted");
    }

    #[test]
    fn test_no_realloc_across_updates() {
        let mut pop = small_population();
        let before = pop.raw().as_ptr();
        for frame in 0..120 {
            advance(&mut pop, Mode::Chaos, frame as f32 / 60.0, 1.0 / 60.0);
        }
        assert_eq!(before, pop.raw().as_ptr());
        assert_eq!(pop.len(), 50);
    }
}
