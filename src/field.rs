//! Continuous 3D wave field sampled by passive tracers.
//!
//! The field is a pure function of (position, time): no per-call state, so
//! identical inputs always yield identical displacement vectors. Six
//! normalized parameters shape the output:
//!
//! - **harmony** - below 0.5, a high-frequency turbulent layer fades in as
//!   harmony drops (dissonance reads as visible chaos)
//! - **flow** - sets spatial wavelength (inverted: high flow = long,
//!   legato waves) and overall amplitude
//! - **density** - carried as a visual-intensity knob; does not alter the
//!   field topology
//! - **space_depth** - scales only the Z output component (flat vs deep)
//! - **rhythm** - time-scale speed (drone to pulse)
//! - **timbre** - above 0.3, a harmonic-overtone layer fades in
//!
//! The phase structure is deliberately cross-axis: the X output depends on
//! the Y and Z positions, Y on Z and X, Z on X and Y. That coupling is what
//! produces smooth, loop-free circulation instead of independent per-axis
//! oscillation, and it must not be "simplified" into same-axis phases.

use glam::Vec3;

/// The six normalized wave-field parameters, each in [0, 1].
///
/// An immutable value struct: updates swap in a whole new value, partial
/// updates use struct-update syntax against [`WaveField::params`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    /// 0 = destructive interference (chaos), 1 = constructive (calm).
    pub harmony: f32,
    /// 0 = short staccato wavelength, 1 = long legato wavelength.
    pub flow: f32,
    /// Energy/intensity knob for the visual layer; no topological effect.
    pub density: f32,
    /// Z-axis propagation strength: 0 = flat, 1 = fully 3D.
    pub space_depth: f32,
    /// Pulse frequency: 0 = drone, 1 = rhythmic.
    pub rhythm: f32,
    /// Harmonic complexity: 0 = pure sine, 1 = rich overtones.
    pub timbre: f32,
}

impl Default for WaveParams {
    /// Balanced, flowing defaults matching the default musical forces.
    fn default() -> Self {
        Self {
            harmony: 0.6,
            flow: 0.7,
            density: 0.5,
            space_depth: 0.6,
            rhythm: 0.3,
            timbre: 0.5,
        }
    }
}

/// Deterministic vector wave field.
pub struct WaveField {
    params: WaveParams,
}

impl WaveField {
    /// Create a field with the given parameters.
    pub fn new(params: WaveParams) -> Self {
        Self { params }
    }

    /// Current parameters.
    #[inline]
    pub fn params(&self) -> WaveParams {
        self.params
    }

    /// Replace the parameter set.
    #[inline]
    pub fn set_params(&mut self, params: WaveParams) {
        self.params = params;
    }

    /// Sample the displacement vector at a position and time.
    pub fn sample(&self, position: Vec3, time: f32) -> Vec3 {
        let WaveParams {
            harmony,
            flow,
            space_depth,
            rhythm,
            timbre,
            ..
        } = self.params;

        // Spatial scale: larger flow = smoother, more coherent patterns
        let spatial_scale = 0.005 + (1.0 - flow) * 0.015;
        let time_speed = 0.3 + rhythm * 0.7;

        let p = position * spatial_scale;
        let t = time * time_speed;

        // Curl-like flow: each axis is phased by the *other* axes
        let mut dx = (p.y + t).sin() + (p.z * 0.7 + t * 0.8).cos() * 0.5;
        let mut dy = (p.z + t * 0.9).sin() + (p.x * 0.7 + t * 0.7).cos() * 0.5;
        let mut dz = ((p.x + t * 0.8).sin() + (p.y * 0.7 + t * 0.6).cos() * 0.5) * space_depth;

        // Harmony: low values layer in turbulent high-frequency chaos
        if harmony < 0.5 {
            let chaos = (0.5 - harmony) * 2.0;
            dx += (p.x * 5.0 + t * 3.0).sin() * chaos * 0.4;
            dy += (p.y * 5.0 + t * 3.0).cos() * chaos * 0.4;
            dz += (p.z * 5.0 + t * 3.0).sin() * chaos * 0.3 * space_depth;
        }

        // Timbre: harmonic overtones on top of the fundamental
        if timbre > 0.3 {
            let overtone = (timbre - 0.3) / 0.7;
            dx += (p.x * 3.0 + t * 2.0).sin() * overtone * 0.25;
            dy += (p.y * 3.0 + t * 2.0).sin() * overtone * 0.25;
            dz += (p.z * 3.0 + t * 2.0).sin() * overtone * 0.2 * space_depth;
        }

        let amplitude = 25.0 + flow * 35.0;
        Vec3::new(dx, dy, dz) * amplitude
    }
}
