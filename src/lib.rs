//! Aura Particle Engine Library
//!
//! Exposes the particle simulation core and its Bevy front end for testing and reuse.

pub mod render;
pub mod resources;
pub mod simulation;
