//! Per-frame systems driving the simulation clock.

use bevy::prelude::*;

use super::config::TICKS_PER_SECOND;
use super::{Aura, Heat};

/// Frames between population reports.
const REPORT_INTERVAL: u32 = 120;

/// Advance the simulation once per frame.
///
/// `dt` is passed in ticks so a 60 Hz frame is `dt = 1.0`.
pub fn step_simulation(time: Res<Time>, mut aura: ResMut<Aura>, mut heat: ResMut<Heat>) {
    let dt_seconds = time.delta_secs();
    aura.0.advance(dt_seconds * TICKS_PER_SECOND);
    heat.0.tick(dt_seconds, aura.0.config());
}

/// Log the live population every few seconds.
pub fn report_population(mut frames: Local<u32>, aura: Res<Aura>, heat: Res<Heat>) {
    *frames += 1;
    if *frames % REPORT_INTERVAL == 0 {
        info!(
            "frame {}: {} particles, heat {:.2}, environment {}",
            *frames,
            aura.0.len(),
            heat.0.intensity(),
            aura.0.force_field().environment.name()
        );
    }
}
