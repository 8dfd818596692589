//! Small vector and scalar helpers shared across the simulation.
//!
//! All vector helpers are zero-safe: a degenerate (zero-length) input never
//! produces a NaN, it falls through to the zero vector.

use glam::Vec3;

/// Limit a vector's magnitude to `max`, preserving direction.
///
/// Vectors already at or below `max` pass through unchanged.
#[inline]
pub fn limit(v: Vec3, max: f32) -> Vec3 {
    v.clamp_length_max(max)
}

/// Rescale a vector to an exact magnitude.
///
/// A zero-length input returns the zero vector (there is no direction to
/// rescale along).
#[inline]
pub fn with_magnitude(v: Vec3, magnitude: f32) -> Vec3 {
    v.normalize_or_zero() * magnitude
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Map a value from one range onto another.
///
/// Does not clamp: values outside `in_min..in_max` extrapolate.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    ((value - in_min) * (out_max - out_min)) / (in_max - in_min) + out_min
}
