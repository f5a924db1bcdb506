//! Force field state and the pure force functions applied by `advance`.
//!
//! Every force here is an impulse: it is added straight to velocity, which is
//! already measured in units per tick.

use bevy::math::Vec2;
use rand::Rng;

use super::config::SimulationConfig;
use crate::resources::Particle;

/// Mutually exclusive ambient drift profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    None,
    /// Buoyancy plus a slow lateral sway
    Water,
    /// Downward pull with horizontal grit
    Sand,
    /// Strong upward lift
    Fire,
    /// Per-tick damping that freezes motion
    Ice,
}

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::None,
        Environment::Water,
        Environment::Sand,
        Environment::Fire,
        Environment::Ice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Environment::None => "none",
            Environment::Water => "water",
            Environment::Sand => "sand",
            Environment::Fire => "fire",
            Environment::Ice => "ice",
        }
    }

    /// The next mode, wrapping back to `None`.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|&e| e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GravityWell {
    pub active: bool,
    pub target: Vec2,
}

/// Externally driven force state read by `advance`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceField {
    /// Pointer position; `None` until the first pointer event
    pub mouse: Option<Vec2>,
    pub gravity_well: GravityWell,
    pub environment: Environment,
}

/// Add an impulse to a particle's velocity.
#[inline]
pub fn apply_force(particle: &mut Particle, fx: f32, fy: f32) {
    particle.velocity.x += fx;
    particle.velocity.y += fy;
}

/// Step 1 of `advance`: nudge velocity according to the environment mode.
///
/// `elapsed` is the simulation clock driving the water sway; `rng` feeds the sand grit.
pub fn environment_bias<R: Rng>(
    particle: &mut Particle,
    environment: Environment,
    elapsed: f32,
    config: &SimulationConfig,
    rng: &mut R,
) {
    match environment {
        Environment::None => {}
        Environment::Water => {
            let sway = (particle.position.y * config.water_sway_frequency
                + elapsed * config.water_sway_speed)
                .sin()
                * config.water_sway;
            apply_force(particle, sway, -config.water_buoyancy);
        }
        Environment::Sand => {
            let jitter = rng.gen_range(-1.0f32..=1.0) * config.sand_jitter;
            apply_force(particle, jitter, config.sand_gravity);
        }
        Environment::Fire => apply_force(particle, 0.0, -config.fire_lift),
        Environment::Ice => particle.velocity *= config.ice_damping,
    }
}

/// Radial impulse away from `center` with linear falloff to zero at `radius`.
///
/// Returns `None` outside the radius and at exactly zero distance.
pub fn radial_impulse(position: Vec2, center: Vec2, radius: f32, force: f32) -> Option<Vec2> {
    let offset = position - center;
    let distance = offset.length();
    if distance >= radius || distance <= 0.0 {
        return None;
    }
    let falloff = 1.0 - distance / radius;
    Some(offset / distance * falloff * force)
}

/// Step 2 of `advance`: push particles away from the pointer.
pub fn mouse_repulsion(particle: &mut Particle, mouse: Vec2, config: &SimulationConfig) {
    if let Some(impulse) = radial_impulse(
        particle.position,
        mouse,
        config.mouse_repulsion_radius,
        config.mouse_repulsion_force,
    ) {
        apply_force(particle, impulse.x, impulse.y);
    }
}

/// Step 3 of `advance`: constant-magnitude pull toward the well target.
pub fn gravity_well_pull(particle: &mut Particle, target: Vec2, config: &SimulationConfig) {
    let offset = target - particle.position;
    let distance = offset.length();
    if distance <= config.gravity_well_epsilon || distance <= 0.0 {
        return;
    }
    let pull = offset / distance * config.gravity_well_force;
    apply_force(particle, pull.x, pull.y);
}

/// Step 6 of `advance`: position-keyed drift plus the constant upward bias.
///
/// The phase comes from the particle's own position and consumed life, so the
/// drift never loops and needs no per-particle random state.
pub fn organic_noise(particle: &mut Particle, dt: f32, config: &SimulationConfig) {
    let phase = (1.0 - particle.life) * config.noise_phase;
    let wx = (particle.position.y * config.noise_frequency + phase).sin();
    let wy = (particle.position.x * config.noise_frequency + phase).cos();
    let amplitude = config.noise_amplitude * dt;
    apply_force(particle, wx * amplitude, wy * amplitude - config.gravity);
}

/// One-shot shockwave impulse for a single particle.
pub fn shockwave_impulse(particle: &mut Particle, center: Vec2, config: &SimulationConfig) -> bool {
    match radial_impulse(
        particle.position,
        center,
        config.shockwave_radius,
        config.shockwave_force,
    ) {
        Some(impulse) => {
            apply_force(particle, impulse.x, impulse.y);
            true
        }
        None => false,
    }
}

/// One-shot implosion: pull a share of the way to the target and burn life.
pub fn implosion_impulse(particle: &mut Particle, target: Vec2, config: &SimulationConfig) {
    let pull = (target - particle.position) * config.implosion_pull;
    apply_force(particle, pull.x, pull.y);
    particle.life -= config.implosion_life_penalty;
}
