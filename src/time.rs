//! Frame clock for the simulation loop.
//!
//! Wraps `std::time::Instant` into per-frame elapsed/delta values. The
//! delta is clamped to an upper bound so a stalled frame (tab in the
//! background, debugger pause) advances the simulation by at most
//! [`MAX_DELTA`] instead of teleporting every agent. Elapsed time
//! accumulates the clamped deltas, so simulation time never jumps either.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = Time::new();
//!
//! // In your frame loop:
//! let (elapsed, dt) = clock.update();
//! system.update(dt);
//! ```

use std::time::Instant;

/// Upper bound on a single frame's delta time, in seconds.
pub const MAX_DELTA: f32 = 0.05;

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Accumulated clamped simulation time in seconds.
    elapsed_secs: f32,
    /// Clamped time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Per-frame delta ceiling.
    max_delta: f32,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            max_delta: MAX_DELTA,
            fixed_delta: None,
        }
    }

    /// Advance the clock. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.delta_secs = self
            .fixed_delta
            .unwrap_or(raw_delta)
            .min(self.max_delta);
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Accumulated simulation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Clamped time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Useful for tests and offline rendering. Pass `None` to return to
    /// real frame timing. Fixed deltas are still clamped.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Change the per-frame delta ceiling.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }

    /// Reset the clock to its initial state.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
