//! Spawn context for agent and tracer initialization.
//!
//! Provides helper methods to reduce boilerplate when placing entities.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Context handed to spawn loops with helpers for common placement patterns.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(i, count);
/// let agent = LineAgent::new(
///     id,
///     ctx.random_in_sphere(spawn_radius),
///     ctx.random_direction() * ctx.random_range(0.5, 2.0),
///     params,
/// );
/// ```
pub struct SpawnContext {
    /// Index of the entity being spawned (0 to count-1).
    pub index: u32,
    /// Total number of entities being spawned.
    pub count: u32,
    /// Internal RNG - use helper methods instead of accessing directly.
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a new spawn context for an entity.
    pub fn new(index: u32, count: u32) -> Self {
        // Seed RNG based on index for variety within a spawn batch,
        // but different each program execution
        let seed = index as u64
            ^ (std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42));

        Self {
            index,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Normalized progress through the spawn batch (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.index as f32 / self.count.max(1) as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Distribution is uniform throughout the volume (cube root on the
    /// radial coordinate).
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = self.rng.gen_range(0.0..PI);
        let r = radius * self.rng.gen::<f32>().cbrt();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Random point on the surface of a sphere of given radius.
    pub fn random_on_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = self.rng.gen_range(0.0..PI);

        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    }

    /// Random unit vector (uniformly distributed on the unit sphere).
    pub fn random_direction(&mut self) -> Vec3 {
        self.random_on_sphere(1.0).normalize()
    }
}
