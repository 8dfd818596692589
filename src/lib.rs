//! # Resona - audio-reactive line-agent simulation engine
//!
//! A field of autonomous line agents whose motion is driven either by
//! flocking behavior or by a continuous vector wave field, both
//! parameterized by six "musical forces" - harmony, flow, density, space
//! depth, rhythm, timbre. The forces come from manual controls or from
//! real-time spectral analysis of playing audio.
//!
//! Resona is the simulation core only: it produces per-frame agent and
//! tracer state (positions, velocities, trails, tumble angles) and leaves
//! rendering, post-processing, and audio playback to external
//! collaborators.
//!
//! ## Flocking mode
//!
//! ```ignore
//! use resona::prelude::*;
//!
//! let mut system = AgentSystem::new(SystemConfig::default(), BehaviorParams::default());
//! let mut clock = Time::new();
//!
//! // In your frame loop:
//! let (_, dt) = clock.update();
//! system.update(dt);
//! renderer.draw_agents(&system.instances());
//! ```
//!
//! ## Field mode
//!
//! ```ignore
//! use resona::prelude::*;
//!
//! let mut waves = WaveSystem::new(120, WaveParams::default(), Vec3::splat(500.0));
//!
//! // In your frame loop:
//! waves.update(dt);
//! for tracer in waves.tracers() {
//!     renderer.draw_trail(tracer.path());
//! }
//! ```
//!
//! ## Driving either mode from audio
//!
//! ```ignore
//! use resona::prelude::*;
//!
//! let mut extractor = FeatureExtractor::new(1024);
//!
//! // In your frame loop, with `spectrum` freshly read from the analyser:
//! let features = extractor.extract_smoothed(&spectrum);
//! waves.set_params(extractor.wave_params(&features));
//! ```
//!
//! Or from manual controls, through the same six-knob vocabulary:
//!
//! ```ignore
//! let forces = MusicalForces { harmony: 0.8, rhythm: 0.6, ..MusicalForces::default() };
//! system.apply_musical_forces(&forces);
//! ```
//!
//! ## Core Concepts
//!
//! - **Agents** flock: cohesion, alignment, and separation over neighbors
//!   found through a uniform spatial hash grid, plus soft spherical
//!   containment and optional formation/pulse forces.
//! - **Tracers** don't flock: they passively sample the wave field and
//!   drag bounded trails behind them.
//! - **Parameters are values**: [`BehaviorParams`] and [`WaveParams`] are
//!   immutable `Copy` structs swapped wholesale into the owning system;
//!   partial updates use struct-update syntax.

mod agent;
pub mod audio;
pub mod behaviors;
pub mod field;
pub mod forces;
pub mod math;
mod spatial;
mod spawn;
mod system;
pub mod time;
mod tracer;

pub use agent::{
    AgentId, AgentInstance, AgentState, BehaviorParams, LineAgent, Neighbor,
    REFERENCE_TICK_RATE, SPIRAL_TENDENCY, TUMBLE_SPEED, VELOCITY_SMOOTHING,
};
pub use audio::{AudioFeatures, FeatureExtractor, DEFAULT_BIN_COUNT};
pub use behaviors::ShapeType;
pub use bytemuck;
pub use field::{WaveField, WaveParams};
pub use forces::{shape_from_rhythm, shape_strength, MusicalForces};
pub use glam::{Quat, Vec3};
pub use spatial::SpatialGrid;
pub use spawn::SpawnContext;
pub use system::{AgentSystem, SystemConfig};
pub use time::{Time, MAX_DELTA};
pub use tracer::{LineTracer, TracerInstance, WaveSystem, TRACER_HISTORY, TRACER_PATH};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use resona::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{AgentInstance, AgentState, BehaviorParams, LineAgent, Neighbor};
    pub use crate::audio::{AudioFeatures, FeatureExtractor};
    pub use crate::behaviors::ShapeType;
    pub use crate::field::{WaveField, WaveParams};
    pub use crate::forces::MusicalForces;
    pub use crate::spatial::SpatialGrid;
    pub use crate::spawn::SpawnContext;
    pub use crate::system::{AgentSystem, SystemConfig};
    pub use crate::time::Time;
    pub use crate::tracer::{LineTracer, TracerInstance, WaveSystem};
    pub use crate::Vec3;
}
