//! Particle data structures shared by the simulation core and the render layer.
//!
//! `Particle` is the mutable simulation record. `RenderableParticle` is the read-only
//! snapshot handed to the draw layer and uses `#[repr(C)]` + `Pod` so a frame's worth
//! of snapshots can be uploaded to a GPU buffer as-is.

use bevy::math::Vec2;
use bytemuck::{Pod, Zeroable};

/// HSL color. Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

/// A single simulated point of the aura.
///
/// `life` runs from 1.0 (fresh) down to 0.0 (dead). `depth` is the pseudo-3D
/// distance from the viewer: 0.0 = far, 1.0 = near. It is fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Spawn sequence number, assigned by the simulation on insert
    pub id: u32,
    /// Position in world units
    pub position: Vec2,
    /// Velocity in units per tick
    pub velocity: Vec2,
    /// Pseudo-3D depth in [0, 1]
    pub depth: f32,
    /// Remaining life, 1.0 = fresh
    pub life: f32,
    /// Size rolled at spawn
    pub base_size: f32,
    /// Size after growth and depth scaling
    pub size: f32,
    pub color: Hsl,
    /// Cleared once `life` reaches zero; inactive particles are purged
    pub active: bool,
}

impl Particle {
    /// Create a fresh particle. The size starts at `base_size` until the first tick.
    pub fn new(position: Vec2, velocity: Vec2, depth: f32, base_size: f32, color: Hsl) -> Self {
        Self {
            id: 0,
            position,
            velocity,
            depth,
            life: 1.0,
            base_size,
            size: base_size,
            color,
            active: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Drawable state of one particle for a single frame.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct RenderableParticle {
    /// Spawn sequence number of the source particle
    pub id: u32,
    /// Position (x, y) in world coordinates
    pub position: [f32; 2],
    /// Circle radius
    pub size: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Hue (degrees), saturation (%), lightness (%)
    pub hsl: [f32; 3],
    /// Depth, for renderers that sort or blur by distance
    pub depth: f32,
    /// 1 when the particle is near enough to receive the glow pass
    pub glow: u32,
    /// Padding for 16-byte alignment (48 bytes total)
    pub _padding: [u32; 2],
}

impl RenderableParticle {
    #[inline]
    pub fn has_glow(&self) -> bool {
        self.glow != 0
    }
}

/// View a snapshot as raw bytes for buffer upload.
pub fn as_bytes(snapshot: &[RenderableParticle]) -> &[u8] {
    bytemuck::cast_slice(snapshot)
}
