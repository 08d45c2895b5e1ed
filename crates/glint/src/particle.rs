//! CPU Particle System
//!
//! Fixed pool of particles recycled as a ring buffer:
//! 1. `emit` writes the next pool slot, overwriting whatever lived there
//! 2. `update` ages, moves and spins every active particle
//! 3. `render` submits one quad per active particle, fading color and size
//!
//! Randomness comes from a seeded ChaCha stream, so a given seed and emit
//! sequence always produces the same particles.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::renderer::{Quad, Renderer};
use crate::timestep::Timestep;

/// Spin applied to every particle, in radians per second.
const SPIN_SPEED: f32 = 0.6;

/// What to emit.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleProps {
    /// Spawn position.
    pub position: [f32; 2],
    /// Base velocity.
    pub velocity: [f32; 2],
    /// Per-axis spread added to `velocity`.
    pub velocity_variation: [f32; 2],
    /// Color at birth.
    pub color_begin: [f32; 4],
    /// Color at death.
    pub color_end: [f32; 4],
    /// Size at birth.
    pub size_begin: f32,
    /// Size at death.
    pub size_end: f32,
    /// Spread added to `size_begin`.
    pub size_variation: f32,
    /// Seconds a particle lives.
    pub lifetime: f32,
}

impl Default for ParticleProps {
    fn default() -> Self {
        Self {
            position: [0.0; 2],
            velocity: [0.0; 2],
            velocity_variation: [3.0, 1.0],
            color_begin: [254.0 / 255.0, 212.0 / 255.0, 123.0 / 255.0, 1.0],
            color_end: [254.0 / 255.0, 109.0 / 255.0, 41.0 / 255.0, 1.0],
            size_begin: 0.5,
            size_end: 0.0,
            size_variation: 0.3,
            lifetime: 1.0,
        }
    }
}

/// A single pooled particle.
#[derive(Clone, Copy, Debug, Default)]
struct Particle {
    position: [f32; 2],
    velocity: [f32; 2],
    color_begin: [f32; 4],
    color_end: [f32; 4],
    rotation: f32,
    size_begin: f32,
    size_end: f32,
    lifetime: f32,
    life_remaining: f32,
    active: bool,
}

/// Fixed-capacity particle pool.
pub struct ParticleSystem {
    pool: Box<[Particle]>,
    /// Next slot `emit` writes.
    next: usize,
    rng: ChaCha8Rng,
}

impl ParticleSystem {
    /// Creates a pool of `pool_size` inactive particles.
    ///
    /// # Panics
    ///
    /// Panics if `pool_size` is zero.
    #[must_use]
    pub fn new(pool_size: usize, seed: u64) -> Self {
        assert!(pool_size > 0, "particle pool must hold at least one particle");
        Self {
            pool: vec![Particle::default(); pool_size].into_boxed_slice(),
            next: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Activates one particle, recycling the oldest slot when the pool wraps.
    pub fn emit(&mut self, props: &ParticleProps) {
        let rotation = self.rng.gen::<f32>() * TAU;
        let jitter = [self.rng.gen::<f32>() - 0.5, self.rng.gen::<f32>() - 0.5];
        let size_jitter = self.rng.gen::<f32>() - 0.5;

        let particle = &mut self.pool[self.next];
        *particle = Particle {
            position: props.position,
            velocity: [
                props.velocity[0] + props.velocity_variation[0] * jitter[0],
                props.velocity[1] + props.velocity_variation[1] * jitter[1],
            ],
            color_begin: props.color_begin,
            color_end: props.color_end,
            rotation,
            size_begin: props.size_begin + props.size_variation * size_jitter,
            size_end: props.size_end,
            lifetime: props.lifetime,
            life_remaining: props.lifetime,
            active: props.lifetime > 0.0,
        };

        self.next = (self.next + 1) % self.pool.len();
    }

    /// Advances every active particle by `ts`.
    pub fn update(&mut self, ts: Timestep) {
        let dt = ts.seconds();
        for particle in self.pool.iter_mut().filter(|particle| particle.active) {
            if particle.life_remaining <= 0.0 {
                particle.active = false;
                continue;
            }
            particle.life_remaining -= dt;
            particle.position[0] += particle.velocity[0] * dt;
            particle.position[1] += particle.velocity[1] * dt;
            particle.rotation += SPIN_SPEED * dt;
        }
    }

    /// Draws every active particle into the open scene.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for particle in self.pool.iter().filter(|particle| particle.active) {
            let life = (particle.life_remaining / particle.lifetime).clamp(0.0, 1.0);
            let mut color = lerp4(particle.color_end, particle.color_begin, life);
            color[3] *= life;
            let size = lerp(particle.size_end, particle.size_begin, life);

            renderer.draw_quad(
                &Quad::new(particle.position, [size, size], color).with_rotation(particle.rotation),
            );
        }
    }

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|particle| particle.active).count()
    }

    /// Pool size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Deactivates every particle.
    pub fn clear(&mut self) {
        for particle in self.pool.iter_mut() {
            particle.active = false;
        }
    }
}

impl std::fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}
