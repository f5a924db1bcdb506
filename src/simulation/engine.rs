//! The particle pool and its per-tick update.
//!
//! Update order inside `advance` (order matters for reproducibility):
//! 1. Environment bias
//! 2. Mouse repulsion
//! 3. Gravity well
//! 4. Position integration (`position += velocity`, one tick)
//! 5. Friction
//! 6. Organic noise + upward drift
//! 7. Life decay
//! 8. Size evolution
//! 9. Death check
//!
//! followed by a purge that keeps survivors in spawn order.

use std::collections::VecDeque;

use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SimulationConfig;
use super::emitter::sample_particle;
use super::forces::{self, Environment, ForceField, GravityWell};
use crate::resources::{Particle, RenderableParticle};

/// Single long-lived owner of every live particle.
///
/// Generic over the random source so tests can inject a seeded generator.
/// All numeric input is trusted: NaN coordinates propagate into particle state
/// without panicking.
#[derive(Debug)]
pub struct ParticleSimulation<R: Rng = StdRng> {
    config: SimulationConfig,
    /// Oldest particle at the front
    particles: VecDeque<Particle>,
    field: ForceField,
    rng: R,
    next_id: u32,
    /// Accumulated `dt`, drives time-keyed cosmetic effects
    elapsed: f32,
}

impl ParticleSimulation<StdRng> {
    /// Simulation seeded from OS entropy.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Simulation with a reproducible random sequence.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleSimulation<R> {
    /// Simulation drawing from `rng`.
    ///
    /// `config` must pass [`SimulationConfig::validate`]: non-finite speed or size
    /// ranges make sampling in `spawn` panic.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid simulation config");
        Self {
            particles: VecDeque::with_capacity(config.max_particles),
            config,
            field: ForceField::default(),
            rng,
            next_id: 0,
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn force_field(&self) -> &ForceField {
        &self.field
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit `count` particles at `(x, y)`.
    ///
    /// `intensity` is clamped to `[0, max_intensity]` and drives launch speed,
    /// saturation and, unless `hue_override` is given, the hue tier.
    pub fn spawn(&mut self, x: f32, y: f32, count: usize, intensity: f32, hue_override: Option<f32>) {
        let intensity = intensity.clamp(0.0, self.config.max_intensity);
        let origin = Vec2::new(x, y);
        for _ in 0..count {
            let particle = sample_particle(&mut self.rng, origin, intensity, hue_override, &self.config);
            self.push(particle);
        }
        self.evict_oldest();
    }

    /// Add a fully formed particle, assigning it the next spawn id.
    pub fn insert(&mut self, particle: Particle) {
        self.push(particle);
        self.evict_oldest();
    }

    fn push(&mut self, mut particle: Particle) {
        particle.id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.particles.push_back(particle);
    }

    fn evict_oldest(&mut self) {
        let excess = self.particles.len().saturating_sub(self.config.max_particles);
        if excess > 0 {
            self.particles.drain(..excess);
            debug!("evicted {} oldest particles", excess);
        }
    }

    /// Run one tick over every particle, then purge the dead.
    ///
    /// Integration always covers exactly one tick; `dt` only scales time-keyed
    /// cosmetic terms (noise amplitude, water sway clock).
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        let field = self.field;
        let config = &self.config;

        for particle in self.particles.iter_mut() {
            forces::environment_bias(particle, field.environment, self.elapsed, config, &mut self.rng);

            if let Some(mouse) = field.mouse {
                forces::mouse_repulsion(particle, mouse, config);
            }

            if field.gravity_well.active {
                forces::gravity_well_pull(particle, field.gravity_well.target, config);
            }

            particle.position += particle.velocity;
            particle.velocity *= config.friction;

            forces::organic_noise(particle, dt, config);

            particle.life -= config.life_decay;
            particle.size =
                particle.base_size * config.growth_factor(particle.life) * config.depth_scale(particle.depth);

            if !particle.is_alive() {
                particle.active = false;
            }
        }

        self.particles.retain(|p| p.active);
    }

    /// Drawable state of every live particle. Does not touch simulation state.
    pub fn snapshot(&self) -> Vec<RenderableParticle> {
        self.particles
            .iter()
            .map(|p| RenderableParticle {
                id: p.id,
                position: p.position.to_array(),
                size: p.size,
                alpha: (p.life * self.config.depth_alpha(p.depth)).clamp(0.0, 1.0),
                hsl: [p.color.hue, p.color.saturation, p.color.lightness],
                depth: p.depth,
                glow: u32::from(p.depth > self.config.glow_depth_threshold),
                _padding: [0; 2],
            })
            .collect()
    }

    /// Pull every active particle toward `target` and shorten its life.
    ///
    /// Particles pushed to zero life are marked inactive and leave the pool on the
    /// next `advance`.
    pub fn trigger_implosion(&mut self, target: Vec2) {
        let mut hit = 0usize;
        for particle in self.particles.iter_mut().filter(|p| p.active) {
            forces::implosion_impulse(particle, target, &self.config);
            if !particle.is_alive() {
                particle.active = false;
            }
            hit += 1;
        }
        debug!("implosion toward {:?} hit {} particles", target, hit);
    }

    /// Push particles within `shockwave_radius` of `center` outward.
    pub fn create_shockwave(&mut self, center: Vec2) {
        let mut hit = 0usize;
        for particle in self.particles.iter_mut().filter(|p| p.active) {
            if forces::shockwave_impulse(particle, center, &self.config) {
                hit += 1;
            }
        }
        debug!("shockwave at {:?} hit {} particles", center, hit);
    }

    pub fn set_gravity_well(&mut self, active: bool, x: f32, y: f32) {
        if self.field.gravity_well.active != active {
            info!("gravity well {}", if active { "engaged" } else { "released" });
        }
        self.field.gravity_well = GravityWell {
            active,
            target: Vec2::new(x, y),
        };
    }

    pub fn set_environment(&mut self, environment: Environment) {
        if self.field.environment != environment {
            info!("environment: {} -> {}", self.field.environment.name(), environment.name());
            self.field.environment = environment;
        }
    }

    pub fn update_mouse_position(&mut self, x: f32, y: f32) {
        self.field.mouse = Some(Vec2::new(x, y));
    }

    /// Stop mouse repulsion, e.g. when the pointer leaves the surface.
    pub fn clear_mouse_position(&mut self) {
        self.field.mouse = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Hsl;

    fn still_particle(x: f32, y: f32, depth: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, depth, 2.0, Hsl::new(200.0, 70.0, 60.0))
    }

    #[test]
    fn spawn_clamps_intensity() {
        let config = SimulationConfig {
            hue_variance: 0.0,
            ..SimulationConfig::default()
        };
        let mut sim = ParticleSimulation::seeded(config.clone(), 1);
        sim.spawn(0.0, 0.0, 1, 50.0, None);
        let p = sim.particles().next().unwrap();
        assert_eq!(p.color.hue, config.tier_hue(config.max_intensity));
        let expected_sat =
            (config.base_saturation + config.max_intensity * config.saturation_gain).min(100.0);
        assert_eq!(p.color.saturation, expected_sat);
    }

    #[test]
    fn ids_follow_spawn_order() {
        let mut sim = ParticleSimulation::seeded(SimulationConfig::default(), 2);
        sim.spawn(0.0, 0.0, 3, 0.0, None);
        sim.insert(still_particle(0.0, 0.0, 0.5));
        let ids: Vec<u32> = sim.particles().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn integration_moves_one_tick_of_velocity() {
        let config = SimulationConfig {
            gravity: 0.0,
            noise_amplitude: 0.0,
            ..SimulationConfig::default()
        };
        let mut sim = ParticleSimulation::seeded(config.clone(), 3);
        let mut p = still_particle(0.0, 0.0, 0.5);
        p.velocity = Vec2::new(2.0, -1.0);
        sim.insert(p);

        // dt does not scale the base integration
        sim.advance(0.25);
        let p = sim.particles().next().unwrap();
        assert_eq!(p.position, Vec2::new(2.0, -1.0));
        assert_eq!(p.velocity, Vec2::new(2.0, -1.0) * config.friction);
    }

    #[test]
    fn size_grows_with_age_and_depth() {
        let config = SimulationConfig::default();
        let mut sim = ParticleSimulation::seeded(config.clone(), 4);
        sim.insert(still_particle(0.0, 0.0, 1.0));
        sim.advance(1.0);
        let first = sim.particles().next().unwrap().size;
        for _ in 0..20 {
            sim.advance(1.0);
        }
        let p = sim.particles().next().unwrap();
        assert!(p.size > first);
        let expected = p.base_size * config.growth_factor(p.life) * config.depth_near_scale;
        assert!((p.size - expected).abs() < 1e-5);
    }

    #[test]
    fn snapshot_alpha_and_glow_follow_depth() {
        let config = SimulationConfig::default();
        let mut sim = ParticleSimulation::seeded(config.clone(), 5);
        sim.insert(still_particle(0.0, 0.0, 0.0));
        sim.insert(still_particle(0.0, 0.0, 1.0));
        let snapshot = sim.snapshot();
        assert!((snapshot[0].alpha - config.depth_far_alpha).abs() < 1e-6);
        assert!((snapshot[1].alpha - config.depth_near_alpha).abs() < 1e-6);
        assert!(!snapshot[0].has_glow());
        assert!(snapshot[1].has_glow());
    }

    #[test]
    fn snapshot_alpha_never_negative() {
        let mut sim = ParticleSimulation::seeded(SimulationConfig::default(), 6);
        let mut p = still_particle(0.0, 0.0, 0.5);
        p.life = -0.5;
        sim.insert(p);
        assert_eq!(sim.snapshot()[0].alpha, 0.0);
    }

    #[test]
    fn mouse_is_inert_until_first_update() {
        let mut sim = ParticleSimulation::seeded(SimulationConfig::default(), 7);
        assert_eq!(sim.force_field().mouse, None);
        sim.update_mouse_position(3.0, 4.0);
        assert_eq!(sim.force_field().mouse, Some(Vec2::new(3.0, 4.0)));
        sim.clear_mouse_position();
        assert_eq!(sim.force_field().mouse, None);
    }

    #[test]
    fn spent_particles_ignore_further_impulses() {
        let config = SimulationConfig {
            implosion_life_penalty: 2.0,
            ..SimulationConfig::default()
        };
        let mut sim = ParticleSimulation::seeded(config, 9);
        sim.insert(still_particle(100.0, 100.0, 0.5));

        let target = Vec2::new(0.0, 100.0);
        sim.trigger_implosion(target);
        let spent = *sim.particles().next().unwrap();
        assert!(!spent.active);

        sim.trigger_implosion(target);
        sim.create_shockwave(Vec2::new(spent.position.x - 1.0, spent.position.y));
        let p = sim.particles().next().unwrap();
        assert_eq!(p.life, spent.life);
        assert_eq!(p.velocity, spent.velocity);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid simulation config")]
    fn rejects_unbounded_speed_in_debug() {
        let config = SimulationConfig {
            max_initial_speed: f32::INFINITY,
            ..SimulationConfig::default()
        };
        let _ = ParticleSimulation::seeded(config, 10);
    }

    #[test]
    fn clear_empties_pool() {
        let mut sim = ParticleSimulation::seeded(SimulationConfig::default(), 8);
        sim.spawn(0.0, 0.0, 10, 1.0, None);
        assert_eq!(sim.len(), 10);
        sim.clear();
        assert!(sim.is_empty());
    }
}
