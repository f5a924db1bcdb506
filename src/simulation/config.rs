//! Simulation tunables.
//!
//! Every constant the engine reads lives in [`SimulationConfig`], which is injected at
//! construction instead of living in module globals, so tests can vary it per case.
//! The defaults reproduce the tuned look of the typing aura; to retune, change
//! `Default` and run `cargo test` to verify the regression suite still passes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Ticks per second the per-tick constants are tuned for.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Intensity threshold that selects a base hue.
///
/// Tiers are ordered by ascending threshold; the highest threshold not above the
/// current intensity wins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HueTier {
    pub threshold: f32,
    pub hue: f32,
}

impl HueTier {
    pub const fn new(threshold: f32, hue: f32) -> Self {
        Self { threshold, hue }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === Population ===
    /// Ceiling on live particles; the oldest are evicted beyond it
    pub max_particles: usize,

    // === Integration ===
    /// Upward drift subtracted from vy every tick (screen space, y grows downward)
    pub gravity: f32,
    /// Velocity multiplier per tick
    pub friction: f32,
    /// Life lost per tick
    pub life_decay: f32,

    // === Emission ===
    pub min_size: f32,
    pub max_size: f32,
    pub max_initial_speed: f32,
    /// Intensity passed to `spawn` is clamped to this
    pub max_intensity: f32,
    /// Speed multiplier is `1 + intensity * intensity_speed_gain`
    pub intensity_speed_gain: f32,
    /// Depth is drawn as `uniform(0,1)^depth_bias`
    pub depth_bias: f32,

    // === Color ===
    pub hue_base: f32,
    /// Total width of the random hue spread around the chosen tier
    pub hue_variance: f32,
    pub hue_tiers: Vec<HueTier>,
    pub base_saturation: f32,
    pub saturation_gain: f32,
    pub lightness: f32,

    // === Glow ===
    pub glow_blur: f32,
    /// Particles deeper than this are drawn with a glow
    pub glow_depth_threshold: f32,

    // === Typing heat ===
    /// Seconds without a keystroke before heat collapses to zero
    pub idle_timeout: f32,
    pub heat_gain: f32,
    /// Heat lost per tick
    pub heat_decay: f32,
    pub heat_max: f32,

    // === Depth ===
    pub depth_near_scale: f32,
    pub depth_far_scale: f32,
    pub depth_near_alpha: f32,
    pub depth_far_alpha: f32,
    /// Width of the speed spread between far and near particles
    pub parallax_strength: f32,
    /// Size grows by `1 + (1 - life) * growth_rate` as the particle dies
    pub growth_rate: f32,

    // === Organic noise ===
    pub noise_amplitude: f32,
    pub noise_frequency: f32,
    /// Phase offset per unit of consumed life
    pub noise_phase: f32,

    // === Interaction ===
    pub shockwave_radius: f32,
    pub shockwave_force: f32,
    pub mouse_repulsion_radius: f32,
    pub mouse_repulsion_force: f32,
    pub gravity_well_force: f32,
    /// Particles closer than this to the well target are left alone
    pub gravity_well_epsilon: f32,
    /// Fraction of the distance to the target added to velocity on implosion
    pub implosion_pull: f32,
    pub implosion_life_penalty: f32,

    // === Environments ===
    pub water_buoyancy: f32,
    pub water_sway: f32,
    pub water_sway_frequency: f32,
    pub water_sway_speed: f32,
    pub sand_gravity: f32,
    pub sand_jitter: f32,
    pub fire_lift: f32,
    pub ice_damping: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let hue_base = 200.0;
        Self {
            max_particles: 800,

            gravity: 0.05,
            friction: 0.96,
            life_decay: 0.012,

            min_size: 1.0,
            max_size: 4.0,
            max_initial_speed: 6.0,
            max_intensity: 5.0,
            intensity_speed_gain: 0.3,
            depth_bias: 0.8,

            hue_base,
            hue_variance: 40.0,
            // calm blue -> violet -> magenta -> ember orange
            hue_tiers: vec![
                HueTier::new(0.0, hue_base),
                HueTier::new(1.5, 280.0),
                HueTier::new(3.0, 330.0),
                HueTier::new(4.5, 30.0),
            ],
            base_saturation: 70.0,
            saturation_gain: 6.0,
            lightness: 60.0,

            glow_blur: 15.0,
            glow_depth_threshold: 0.7,

            idle_timeout: 2.0,
            heat_gain: 0.5,
            heat_decay: 0.02,
            heat_max: 5.0,

            depth_near_scale: 1.5,
            depth_far_scale: 0.5,
            depth_near_alpha: 1.0,
            depth_far_alpha: 0.35,
            parallax_strength: 1.0,
            growth_rate: 1.5,

            noise_amplitude: 0.05,
            noise_frequency: 0.01,
            noise_phase: 10.0,

            shockwave_radius: 150.0,
            shockwave_force: 12.0,
            mouse_repulsion_radius: 100.0,
            mouse_repulsion_force: 1.5,
            gravity_well_force: 0.8,
            gravity_well_epsilon: 10.0,
            implosion_pull: 0.1,
            implosion_life_penalty: 0.1,

            water_buoyancy: 0.08,
            water_sway: 0.1,
            water_sway_frequency: 0.02,
            water_sway_speed: 2.0,
            sand_gravity: 0.15,
            sand_jitter: 0.3,
            fire_lift: 0.25,
            ice_damping: 0.9,
        }
    }
}

impl SimulationConfig {
    /// Base hue for an intensity: the last tier whose threshold is <= intensity.
    /// Falls back to `hue_base` when no tier qualifies.
    pub fn tier_hue(&self, intensity: f32) -> f32 {
        let mut hue = self.hue_base;
        for tier in &self.hue_tiers {
            if intensity >= tier.threshold {
                hue = tier.hue;
            }
        }
        hue
    }

    /// Size multiplier for a depth, far -> near.
    #[inline]
    pub fn depth_scale(&self, depth: f32) -> f32 {
        lerp(self.depth_far_scale, self.depth_near_scale, depth)
    }

    /// Alpha multiplier for a depth, far -> near.
    #[inline]
    pub fn depth_alpha(&self, depth: f32) -> f32 {
        lerp(self.depth_far_alpha, self.depth_near_alpha, depth)
    }

    /// Launch speed multiplier for a depth. Near particles get the wider range.
    #[inline]
    pub fn parallax_factor(&self, depth: f32) -> f32 {
        1.0 + (depth - 0.5) * self.parallax_strength
    }

    /// Size multiplier for the consumed share of life.
    #[inline]
    pub fn growth_factor(&self, life: f32) -> f32 {
        1.0 + (1.0 - life) * self.growth_rate
    }

    /// Check that every tunable is in a range the integrator can handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::invalid("max_particles", "must be positive"));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::invalid("friction", "must be in (0, 1]"));
        }
        if !(self.life_decay > 0.0) {
            return Err(ConfigError::invalid("life_decay", "must be positive"));
        }
        if !(self.min_size >= 0.0 && self.min_size <= self.max_size) {
            return Err(ConfigError::invalid("min_size", "must be in [0, max_size]"));
        }
        if !self.max_size.is_finite() {
            return Err(ConfigError::invalid("max_size", "must be finite"));
        }
        if !(self.ice_damping > 0.0 && self.ice_damping < 1.0) {
            return Err(ConfigError::invalid("ice_damping", "must be in (0, 1)"));
        }
        if !(self.parallax_strength >= 0.0 && self.parallax_strength < 2.0) {
            return Err(ConfigError::invalid(
                "parallax_strength",
                "must be in [0, 2) to keep far particles moving forward",
            ));
        }
        if !(self.depth_bias > 0.0) {
            return Err(ConfigError::invalid("depth_bias", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.glow_depth_threshold) {
            return Err(ConfigError::invalid("glow_depth_threshold", "must be in [0, 1]"));
        }
        if self.hue_tiers.is_empty() {
            return Err(ConfigError::invalid("hue_tiers", "must not be empty"));
        }
        if self
            .hue_tiers
            .windows(2)
            .any(|pair| pair[0].threshold > pair[1].threshold)
        {
            return Err(ConfigError::invalid("hue_tiers", "thresholds must be ascending"));
        }

        let non_negative = [
            ("shockwave_radius", self.shockwave_radius),
            ("shockwave_force", self.shockwave_force),
            ("mouse_repulsion_radius", self.mouse_repulsion_radius),
            ("mouse_repulsion_force", self.mouse_repulsion_force),
            ("gravity_well_force", self.gravity_well_force),
            ("gravity_well_epsilon", self.gravity_well_epsilon),
            ("max_initial_speed", self.max_initial_speed),
            ("max_intensity", self.max_intensity),
            ("heat_max", self.heat_max),
            ("heat_decay", self.heat_decay),
            ("idle_timeout", self.idle_timeout),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and non-negative"));
            }
        }

        Ok(())
    }

    /// Load a config from a JSON file. Missing fields take their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
