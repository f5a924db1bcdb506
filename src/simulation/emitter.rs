//! Sampling of freshly spawned particles.

use std::f32::consts::TAU;

use bevy::math::Vec2;
use rand::Rng;

use super::config::SimulationConfig;
use crate::resources::{Hsl, Particle};

/// Depth skewed toward the far plane: most particles are distant, a few are close.
pub fn sample_depth<R: Rng>(rng: &mut R, config: &SimulationConfig) -> f32 {
    rng.gen::<f32>().powf(config.depth_bias)
}

/// Launch velocity for a direction and a raw speed roll in `[0, max_initial_speed)`.
///
/// Intensity widens the burst linearly and depth applies the parallax factor,
/// so near particles leave the emitter faster than far ones.
pub fn launch_velocity(
    angle: f32,
    speed_roll: f32,
    intensity: f32,
    depth: f32,
    config: &SimulationConfig,
) -> Vec2 {
    let speed = speed_roll
        * (1.0 + intensity * config.intensity_speed_gain)
        * config.parallax_factor(depth);
    Vec2::from_angle(angle) * speed
}

/// Particle color for an intensity, optionally pinned to a caller-chosen hue.
pub fn sample_color<R: Rng>(
    rng: &mut R,
    intensity: f32,
    hue_override: Option<f32>,
    config: &SimulationConfig,
) -> Hsl {
    let base = hue_override.unwrap_or_else(|| config.tier_hue(intensity));
    let spread = if config.hue_variance > 0.0 {
        rng.gen_range(-0.5f32..0.5) * config.hue_variance
    } else {
        0.0
    };
    let saturation = (config.base_saturation + intensity * config.saturation_gain).min(100.0);
    Hsl::new((base + spread).rem_euclid(360.0), saturation, config.lightness)
}

/// Roll one particle at `origin`. `intensity` must already be clamped.
pub fn sample_particle<R: Rng>(
    rng: &mut R,
    origin: Vec2,
    intensity: f32,
    hue_override: Option<f32>,
    config: &SimulationConfig,
) -> Particle {
    let depth = sample_depth(rng, config);
    let angle = rng.gen_range(0.0..TAU);
    let speed_roll = if config.max_initial_speed > 0.0 {
        rng.gen_range(0.0..config.max_initial_speed)
    } else {
        0.0
    };
    let velocity = launch_velocity(angle, speed_roll, intensity, depth, config);
    let base_size = if config.max_size > config.min_size {
        rng.gen_range(config.min_size..=config.max_size)
    } else {
        config.min_size
    };
    let color = sample_color(rng, intensity, hue_override, config);

    let mut particle = Particle::new(origin, velocity, depth, base_size, color);
    particle.size = base_size * config.depth_scale(depth);
    particle
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn depth_is_skewed_far() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let samples: Vec<f32> = (0..2000).map(|_| sample_depth(&mut rng, &config)).collect();
        assert!(samples.iter().all(|d| (0.0..=1.0).contains(d)));
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        // E[U^0.8] = 1 / 1.8
        assert!(mean < 0.6, "mean depth {}", mean);
        assert!(mean > 0.5, "mean depth {}", mean);
    }

    #[test]
    fn near_particles_launch_faster() {
        let config = SimulationConfig::default();
        let far = launch_velocity(1.0, 3.0, 0.0, 0.0, &config);
        let near = launch_velocity(1.0, 3.0, 0.0, 1.0, &config);
        assert!(near.length() > far.length());
        // same direction
        assert!((far.normalize().dot(near.normalize()) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn intensity_scales_speed_linearly() {
        let config = SimulationConfig::default();
        let calm = launch_velocity(0.0, 2.0, 0.0, 0.5, &config);
        let hot = launch_velocity(0.0, 2.0, 2.0, 0.5, &config);
        let expected = 1.0 + 2.0 * config.intensity_speed_gain;
        assert!((hot.length() / calm.length() - expected).abs() < 1e-5);
    }

    #[test]
    fn hue_override_wins_over_tiers() {
        let config = SimulationConfig {
            hue_variance: 0.0,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sample_color(&mut rng, 4.9, Some(120.0), &config).hue, 120.0);
        assert_eq!(sample_color(&mut rng, 4.9, None, &config).hue, 30.0);
    }

    #[test]
    fn hue_spread_stays_within_variance() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            let hue = sample_color(&mut rng, 0.0, None, &config).hue;
            assert!((hue - config.hue_base).abs() <= config.hue_variance / 2.0);
        }
    }

    #[test]
    fn saturation_caps_at_full() {
        let config = SimulationConfig {
            saturation_gain: 50.0,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(sample_color(&mut rng, 5.0, None, &config).saturation, 100.0);
        assert_eq!(sample_color(&mut rng, 0.0, None, &config).saturation, config.base_saturation);
    }

    #[test]
    fn sampled_particle_respects_bounds() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..500 {
            let p = sample_particle(&mut rng, Vec2::new(10.0, 20.0), 1.0, None, &config);
            assert_eq!(p.position, Vec2::new(10.0, 20.0));
            assert_eq!(p.life, 1.0);
            assert!(p.base_size >= config.min_size && p.base_size <= config.max_size);
            let max_speed = config.max_initial_speed
                * (1.0 + config.intensity_speed_gain)
                * config.parallax_factor(1.0);
            assert!(p.velocity.length() <= max_speed + 1e-4);
        }
    }
}
