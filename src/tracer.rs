//! Line tracers: passive entities advected by the wave field.
//!
//! Tracers do not flock. Each one samples the [`WaveField`] at its own
//! position, blends the displacement into a smoothed velocity for inertia,
//! and drags a bounded position history behind it for trail rendering.
//! Tracers are never destroyed: one that drifts past the bound radius is
//! recycled to the opposite side of the sphere with a cleared history.

use crate::agent::REFERENCE_TICK_RATE;
use crate::field::{WaveField, WaveParams};
use crate::spawn::SpawnContext;
use crate::time::MAX_DELTA;
use glam::Vec3;
use std::collections::VecDeque;

/// Positions retained per tracer.
pub const TRACER_HISTORY: usize = 80;

/// Positions exposed through [`LineTracer::path`] for curve rendering.
pub const TRACER_PATH: usize = 60;

/// Blend factor toward the sampled displacement per reference tick.
/// Lower = heavier inertia, smoother trails.
const VELOCITY_BLEND: f32 = 0.15;

/// Fraction of the smoothed velocity applied per reference tick.
const STEP_SCALE: f32 = 0.5;

/// Radius of the sphere tracers initially spawn inside.
const SPAWN_RADIUS: f32 = 150.0;

/// Fraction of the bound radius a recycled tracer re-enters at.
const REENTRY_FRACTION: f32 = 0.8;

/// Per-frame render snapshot of a tracer head.
///
/// Plain-old-data so a rendering collaborator can `bytemuck::cast_slice`
/// a batch of these straight into a vertex buffer. Trail points come from
/// [`LineTracer::path`].
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TracerInstance {
    /// Head position.
    pub position: [f32; 3],
    /// Ticks alive, as a float for shader convenience.
    pub age: f32,
}

/// A single wave-field tracer.
pub struct LineTracer {
    /// Current head position.
    pub position: Vec3,
    velocity: Vec3,
    history: VecDeque<Vec3>,
    age: u32,
}

impl LineTracer {
    /// Create a tracer at a position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            history: VecDeque::with_capacity(TRACER_HISTORY + 1),
            age: 0,
        }
    }

    /// Advance the tracer by one tick of field displacement.
    pub fn update(&mut self, displacement: Vec3, dt: f32) {
        let step = dt * REFERENCE_TICK_RATE;

        // Inertia: ease the velocity toward the sampled displacement
        self.velocity = self.velocity.lerp(displacement, VELOCITY_BLEND);
        self.position += self.velocity * (STEP_SCALE * step);

        self.history.push_front(self.position);
        if self.history.len() > TRACER_HISTORY {
            self.history.pop_back();
        }

        self.age += 1;
    }

    /// Reposition the tracer and clear its trail.
    ///
    /// The smoothed velocity is kept, so a recycled tracer re-enters with
    /// its momentum instead of stalling at the boundary.
    pub fn recycle(&mut self, position: Vec3) {
        self.position = position;
        self.history.clear();
    }

    /// Trail positions from newest to oldest, at most [`TRACER_PATH`] long.
    pub fn path(&self) -> impl Iterator<Item = &Vec3> {
        self.history.iter().take(TRACER_PATH)
    }

    /// Number of stored trail positions.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Ticks alive.
    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Render snapshot of the tracer head.
    pub fn instance(&self) -> TracerInstance {
        TracerInstance {
            position: self.position.to_array(),
            age: self.age as f32,
        }
    }
}

/// Owns the tracer population and the wave field driving it.
pub struct WaveSystem {
    tracers: Vec<LineTracer>,
    field: WaveField,
    time: f32,
    bounds: Vec3,
}

impl WaveSystem {
    /// Spawn `tracer_count` tracers inside the spawn sphere.
    pub fn new(tracer_count: usize, params: WaveParams, bounds: Vec3) -> Self {
        let mut tracers = Vec::with_capacity(tracer_count);
        for i in 0..tracer_count {
            let mut ctx = SpawnContext::new(i as u32, tracer_count as u32);
            tracers.push(LineTracer::new(ctx.random_in_sphere(SPAWN_RADIUS)));
        }

        Self {
            tracers,
            field: WaveField::new(params),
            time: 0.0,
            bounds,
        }
    }

    /// Advance every tracer by one tick.
    ///
    /// `dt` is wall-clock seconds since the previous tick, clamped to
    /// [`MAX_DELTA`].
    pub fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_DELTA);
        self.time += dt;

        let bound_radius = self.bounds.min_element() / 2.0;

        for tracer in &mut self.tracers {
            let displacement = self.field.sample(tracer.position, self.time);
            tracer.update(displacement, dt);

            // Recycle past the boundary: re-enter from the antipode
            if tracer.position.length() > bound_radius {
                let reentry =
                    tracer.position.normalize_or_zero() * (-bound_radius * REENTRY_FRACTION);
                tracer.recycle(reentry);
            }
        }
    }

    /// The tracer population, for trail rendering.
    #[inline]
    pub fn tracers(&self) -> &[LineTracer] {
        &self.tracers
    }

    /// Render snapshots of all tracer heads.
    pub fn instances(&self) -> Vec<TracerInstance> {
        self.tracers.iter().map(LineTracer::instance).collect()
    }

    /// Current wave parameters.
    #[inline]
    pub fn params(&self) -> WaveParams {
        self.field.params()
    }

    /// Replace the wave parameters.
    #[inline]
    pub fn set_params(&mut self, params: WaveParams) {
        self.field.set_params(params);
    }

    /// Accumulated simulation time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }
}
