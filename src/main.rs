//! Aura - Main Entry
//!
//! Type into the window to grow a particle aura around a virtual caret.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use aura::render::ParticleRenderPlugin;
use aura::simulation::SimulationPlugin;

/// Optional tuning file read from the working directory.
const CONFIG_FILE: &str = "aura.json";

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Aura".into(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=warn,naga=warn,info".into(),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)))
        .add_plugins(SimulationPlugin::from_file(CONFIG_FILE))
        .add_plugins(ParticleRenderPlugin)
        .add_systems(Startup, setup_camera)
        .run();
}

/// Set up the 2D main camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
