//! Particle rendering module - draws simulation snapshots with gizmo circles.
//!
//! The simulation works in window coordinates (origin top-left, y down); the 2D
//! camera looks at world space (origin center, y up). Conversion happens here.

use bevy::math::Isometry2d;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::resources::RenderableParticle;
use crate::simulation::{Aura, AuraSet};

/// Share of the glow blur radius added around near particles.
const GLOW_SPREAD: f32 = 0.25;
/// Opacity of the glow halo relative to the particle.
const GLOW_ALPHA: f32 = 0.3;

/// Plugin for drawing particles each frame after the simulation step.
pub struct ParticleRenderPlugin;

impl Plugin for ParticleRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_particles.after(AuraSet::Step));
    }
}

/// Window coordinates to camera world coordinates.
pub fn window_to_world(position: [f32; 2], window_size: Vec2) -> Vec2 {
    Vec2::new(
        position[0] - window_size.x * 0.5,
        window_size.y * 0.5 - position[1],
    )
}

/// Color of a snapshot record, with its alpha scaled by `alpha_scale`.
pub fn particle_color(particle: &RenderableParticle, alpha_scale: f32) -> Color {
    let [hue, saturation, lightness] = particle.hsl;
    Color::hsla(
        hue,
        saturation / 100.0,
        lightness / 100.0,
        particle.alpha * alpha_scale,
    )
}

pub fn glow_radius(particle: &RenderableParticle, glow_blur: f32) -> f32 {
    particle.size + glow_blur * GLOW_SPREAD
}

pub fn draw_particles(
    aura: Res<Aura>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let window_size = window.size();
    let glow_blur = aura.0.config().glow_blur;

    for particle in aura.0.snapshot() {
        let center = Isometry2d::from_translation(window_to_world(particle.position, window_size));
        if particle.has_glow() {
            gizmos.circle_2d(
                center,
                glow_radius(&particle, glow_blur),
                particle_color(&particle, GLOW_ALPHA),
            );
        }
        gizmos.circle_2d(center, particle.size, particle_color(&particle, 1.0));
    }
}
