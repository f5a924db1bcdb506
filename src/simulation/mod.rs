//! Simulation module - the particle engine core and the plugin that drives it.

mod config;
mod emitter;
mod engine;
mod error;
mod forces;
mod heat;
pub mod input;
mod systems;

use std::path::PathBuf;

use bevy::prelude::*;

pub use config::{HueTier, SimulationConfig, TICKS_PER_SECOND};
pub use emitter::{launch_velocity, sample_color, sample_depth, sample_particle};
pub use engine::ParticleSimulation;
pub use error::ConfigError;
pub use forces::{
    apply_force, environment_bias, gravity_well_pull, implosion_impulse, mouse_repulsion,
    organic_noise, radial_impulse, shockwave_impulse, Environment, ForceField, GravityWell,
};
pub use heat::HeatMeter;

/// The live simulation, owned by the app.
#[derive(Resource, Debug)]
pub struct Aura(pub ParticleSimulation);

/// Typing heat feeding spawn intensity.
#[derive(Resource, Debug, Default)]
pub struct Heat(pub HeatMeter);

/// Ordering of the per-frame work: input first, then one simulation tick.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum AuraSet {
    Input,
    Step,
}

/// Plugin that owns the particle simulation and feeds it input every frame.
#[derive(Default)]
pub struct SimulationPlugin {
    /// Optional JSON config; defaults are used when absent or invalid
    pub config_path: Option<PathBuf>,
}

impl SimulationPlugin {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    fn resolve_config(&self) -> SimulationConfig {
        let Some(path) = &self.config_path else {
            return SimulationConfig::default();
        };
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return SimulationConfig::default();
        }
        match SimulationConfig::load(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                warn!("ignoring {}: {}", path.display(), err);
                SimulationConfig::default()
            }
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.resolve_config();
        info!(
            "aura: max {} particles, decay {}/tick",
            config.max_particles, config.life_decay
        );

        app.insert_resource(Aura(ParticleSimulation::new(config)))
            .init_resource::<Heat>()
            .init_resource::<input::Caret>()
            .configure_sets(Update, (AuraSet::Input, AuraSet::Step).chain())
            .add_systems(
                Update,
                (
                    input::handle_typing,
                    input::handle_pointer,
                    input::handle_environment_keys,
                    input::handle_idle,
                )
                    .in_set(AuraSet::Input),
            )
            .add_systems(
                Update,
                (systems::step_simulation, systems::report_population)
                    .chain()
                    .in_set(AuraSet::Step),
            );
    }
}
