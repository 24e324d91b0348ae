//! A single firework spark.

use bytemuck::{Pod, PodCastError, Zeroable};
use glam::Vec2;

/// Per-frame physics constants applied to every spark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkPhysics {
    /// Multiplicative velocity damping per tick.
    pub drag: f32,
    /// Downward acceleration added to vertical velocity per tick.
    pub gravity: f32,
}

impl Default for SparkPhysics {
    fn default() -> Self {
        Self { drag: 0.98, gravity: 0.04 }
    }
}

/// A spark in CSS pixel space (y grows downward).
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Opacity, 1.0 at birth. The spark is alive while this is positive.
    pub alpha: f32,
    pub decay: f32,
    pub radius: f32,
    /// Hue in degrees, [0, 360).
    pub hue: i32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, decay: f32, radius: f32, hue: i32) -> Self {
        Particle {
            position,
            velocity,
            alpha: 1.0,
            decay,
            radius,
            hue: hue.rem_euclid(360),
        }
    }

    /// Advance one animation frame. Returns false once the spark has faded out.
    pub fn tick(&mut self, physics: SparkPhysics) -> bool {
        self.position += self.velocity;
        self.velocity *= physics.drag;
        self.velocity.y += physics.gravity;
        self.alpha -= self.decay;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn to_instance(&self) -> ParticleInstance {
        ParticleInstance {
            x: self.position.x,
            y: self.position.y,
            radius: self.radius,
            alpha: self.alpha.max(0.0),
            hue: self.hue as f32,
        }
    }
}

/// Flat draw record handed to the host each frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub hue: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 5;

    /// View a packed float buffer as instances. Fails unless the length is a
    /// whole number of instances.
    pub fn from_floats(floats: &[f32]) -> Result<&[Self], PodCastError> {
        bytemuck::try_cast_slice(floats)
    }

    /// CSS color for a spark of this hue.
    pub fn fill_style(&self) -> String {
        format!("hsl({}, 90%, 65%)", self.hue)
    }
}
