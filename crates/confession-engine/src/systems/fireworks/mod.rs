//! Celebration fireworks: radial bursts of sparks under drag and gravity.
//!
//! `FireworksState` owns the live spark set. Each animation frame the host
//! calls [`FireworksState::tick`] and then draws the rebuilt instance buffer.

mod particle;
mod rng;

pub use particle::{Particle, ParticleInstance, SparkPhysics};
pub use rng::Rng;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tuning for burst spawning and spark physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Sparks per burst, evenly spaced around a full circle.
    pub burst_size: usize,
    /// No new burst is rolled while this many sparks are alive.
    pub max_particles: usize,
    /// Per-frame probability of a new burst.
    pub spawn_chance: f32,
    pub speed_range: (f32, f32),
    pub decay_range: (f32, f32),
    pub radius_range: (f32, f32),
    pub drag: f32,
    pub gravity: f32,
    /// Per-spark hue offset from the burst hue, in degrees either way.
    pub hue_jitter: f32,
    pub seed: u64,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            burst_size: 32,
            max_particles: 300,
            spawn_chance: 0.16,
            speed_range: (2.0, 4.5),
            decay_range: (0.015, 0.035),
            radius_range: (2.0, 4.0),
            drag: 0.98,
            gravity: 0.04,
            hue_jitter: 20.0,
            seed: 0x5EED_F12E,
        }
    }
}

impl FireworksConfig {
    fn physics(&self) -> SparkPhysics {
        SparkPhysics {
            drag: self.drag,
            gravity: self.gravity,
        }
    }
}

pub struct FireworksState {
    pub particles: Vec<Particle>,
    pub draw_buffer: Vec<ParticleInstance>,
    pub rng: Rng,
    /// Canvas size in CSS pixels.
    pub bounds: Vec2,
    config: FireworksConfig,
}

impl FireworksState {
    pub fn new(config: FireworksConfig) -> Self {
        FireworksState {
            particles: Vec::with_capacity(config.max_particles + config.burst_size),
            draw_buffer: Vec::with_capacity(config.max_particles + config.burst_size),
            rng: Rng::new(config.seed),
            bounds: Vec2::ZERO,
            config,
        }
    }

    /// Start a fresh show on a canvas of `bounds` CSS pixels.
    pub fn launch(&mut self, bounds: Vec2) {
        self.clear();
        self.bounds = bounds;
    }

    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Emit one ring of sparks from a random point in the upper-center region.
    pub fn spawn_burst(&mut self) {
        let w = self.bounds.x;
        let h = self.bounds.y;
        let origin = Vec2::new(
            self.rng.next_f32() * w * 0.8 + w * 0.1,
            self.rng.next_f32() * h * 0.5 + h * 0.1,
        );
        let base_hue = self.rng.next_int(360) as f32;
        let count = self.config.burst_size;
        let jitter = self.config.hue_jitter;

        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = self.rng.range(self.config.speed_range.0, self.config.speed_range.1);
            let velocity = Vec2::from_angle(angle) * speed;
            let decay = self.rng.range(self.config.decay_range.0, self.config.decay_range.1);
            let radius = self.rng.range(self.config.radius_range.0, self.config.radius_range.1);
            let hue = (base_hue + self.rng.range(-jitter, jitter)).round() as i32;
            self.particles
                .push(Particle::new(origin, velocity, decay, radius, hue));
        }
    }

    /// One animation frame: maybe spawn, advance every spark, drop the dead.
    pub fn tick(&mut self) {
        if self.particles.len() < self.config.max_particles
            && self.rng.chance(self.config.spawn_chance)
        {
            self.spawn_burst();
        }
        let physics = self.config.physics();
        self.particles.retain_mut(|p| p.tick(physics));
    }

    /// Rebuild the per-frame draw list from the live sparks.
    pub fn rebuild_draw_buffer(&mut self) {
        self.draw_buffer.clear();
        self.draw_buffer
            .extend(self.particles.iter().map(Particle::to_instance));
    }

    /// The draw list as packed floats (`ParticleInstance::FLOATS` per spark).
    pub fn draw_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.draw_buffer.as_slice())
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.draw_buffer.clear();
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}
