//! Line agents: the autonomous entities of the flocking simulation.
//!
//! Each agent carries a small state block ([`AgentState`]) and integrates
//! accumulated steering forces once per tick. The integration applies a
//! global velocity-smoothing blend ("grace"), a gentle spiral drift, and a
//! slow tumble rotation used only for rendering orientation variety.

use crate::behaviors;
use crate::math;
use glam::{Quat, Vec3};

/// Blend factor toward the previous tick's velocity (0-1).
///
/// Higher = more inertia. This single constant is what separates graceful
/// motion from jittery motion; it is global, never per-agent.
pub const VELOCITY_SMOOTHING: f32 = 0.92;

/// Strength of the per-tick spiral drift (0-1).
pub const SPIRAL_TENDENCY: f32 = 0.15;

/// Tumble rotation accumulated per reference tick, in radians.
pub const TUMBLE_SPEED: f32 = 0.02;

/// The frame rate the tuned force constants were calibrated against.
///
/// Integration scales by `dt * REFERENCE_TICK_RATE` so real elapsed time
/// drives the step while the per-frame tuning keeps its meaning.
pub const REFERENCE_TICK_RATE: f32 = 60.0;

/// Unique agent identity.
///
/// Issued as a monotonic counter by the owning [`AgentSystem`]. Uniqueness
/// is needed for self-exclusion in neighbor queries and for per-agent phase
/// offsets in formation shapes; nothing stronger.
///
/// [`AgentSystem`]: crate::AgentSystem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentId(pub(crate) u32);

impl AgentId {
    /// The raw counter value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Per-agent simulation state.
///
/// Owned exclusively by its [`LineAgent`]; copies of it flow into the
/// spatial grid each tick, which makes the grid a consistent previous-tick
/// snapshot for every neighbor query.
#[derive(Clone, Copy, Debug)]
pub struct AgentState {
    /// Unique identity, used for neighbor-query exclusion and phase offsets.
    pub id: AgentId,
    /// World position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Per-tick force accumulator, reset to zero after integration.
    pub acceleration: Vec3,
    /// Ticks alive, monotonically increasing.
    pub age: u32,
}

/// Flocking behavior configuration.
///
/// An immutable value struct shared across all agents in a system. Updates
/// swap in a whole new value; partial updates use struct-update syntax:
///
/// ```ignore
/// system.set_params(BehaviorParams {
///     max_speed: 6.0,
///     ..system.params()
/// });
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorParams {
    /// Attraction toward the neighbor center of mass (0-2).
    pub cohesion_strength: f32,
    /// Velocity matching with neighbors (0-2).
    pub alignment_strength: f32,
    /// Repulsion from neighbors inside the separation radius (0-2).
    pub separation_strength: f32,
    /// Velocity magnitude cap.
    pub max_speed: f32,
    /// Steering force magnitude cap.
    pub max_force: f32,
    /// Neighbor visibility distance. Also sets the spatial grid cell size.
    pub perception_radius: f32,
    /// Personal-space threshold, below the perception radius.
    pub separation_radius: f32,
}

impl Default for BehaviorParams {
    /// Defaults tuned for flowing, murmuration-like grace: strong cohesion
    /// and alignment, low separation, and a small force cap for smooth
    /// acceleration.
    fn default() -> Self {
        Self {
            cohesion_strength: 1.2,
            alignment_strength: 1.5,
            separation_strength: 0.8,
            max_speed: 4.0,
            max_force: 0.08,
            perception_radius: 120.0,
            separation_radius: 25.0,
        }
    }
}

/// A neighboring agent paired with its precomputed distance.
///
/// Built fresh from spatial-grid query results every tick; never persisted.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    /// The neighbor's previous-tick state.
    pub state: AgentState,
    /// Euclidean distance from the querying agent.
    pub distance: f32,
}

/// Per-frame render snapshot of an agent.
///
/// Plain-old-data so a rendering collaborator can `bytemuck::cast_slice`
/// a batch of these straight into an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AgentInstance {
    /// World position.
    pub position: [f32; 3],
    /// Accumulated tumble angle in radians.
    pub tumble: f32,
    /// Current velocity.
    pub velocity: [f32; 3],
    /// Ticks alive, as a float for shader convenience.
    pub age: f32,
}

/// A single simulated line agent.
pub struct LineAgent {
    /// Simulation state, readable by the renderer every frame.
    pub state: AgentState,
    params: BehaviorParams,
    previous_velocity: Vec3,
    tumble: f32,
}

impl LineAgent {
    /// Create an agent at a position with an initial velocity.
    pub fn new(id: AgentId, position: Vec3, velocity: Vec3, params: BehaviorParams) -> Self {
        Self {
            state: AgentState {
                id,
                position,
                velocity,
                acceleration: Vec3::ZERO,
                age: 0,
            },
            params,
            previous_velocity: velocity,
            tumble: 0.0,
        }
    }

    /// Accumulate the three flocking forces from this tick's neighbor set.
    pub fn flock(&mut self, neighbors: &[Neighbor]) {
        let cohesion =
            behaviors::cohesion(&self.state, neighbors, self.params.cohesion_strength);
        let alignment =
            behaviors::alignment(&self.state, neighbors, self.params.alignment_strength);
        let separation = behaviors::separation(
            &self.state,
            neighbors,
            self.params.separation_strength,
            self.params.separation_radius,
        );

        self.state.acceleration += cohesion;
        self.state.acceleration += alignment;
        self.state.acceleration += separation;
    }

    /// Accumulate the soft spherical containment force.
    pub fn constrain(&mut self, bounds: Vec3) {
        let bound_radius = bounds.min_element() / 2.0;
        self.state.acceleration += behaviors::bound_sphere(&self.state, bound_radius, 0.5);
    }

    /// Accumulate an arbitrary external force (wave field, formation shape,
    /// rhythmic pulse).
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.state.acceleration += force;
    }

    /// Integrate accumulated forces into velocity and position.
    ///
    /// Order per tick: velocity gains acceleration and is clamped to
    /// `max_speed`, then blended toward last tick's velocity by
    /// [`VELOCITY_SMOOTHING`], spiral drift rotates it slightly, position
    /// advances, tumble accumulates, the accumulator resets, and age ticks.
    pub fn update(&mut self, dt: f32) {
        let step = dt * REFERENCE_TICK_RATE;
        let state = &mut self.state;

        state.velocity += state.acceleration * step;
        state.velocity = math::limit(state.velocity, self.params.max_speed);

        // Grace: heavy blend toward the previous tick's velocity
        state.velocity = self
            .previous_velocity
            .lerp(state.velocity, 1.0 - VELOCITY_SMOOTHING);

        // Spiral drift: rotate velocity a hair around world-up, direction
        // alternating by id parity so the flock doesn't corkscrew in unison
        let sign = if state.id.raw() % 2 == 0 { 1.0 } else { -1.0 };
        let angle = SPIRAL_TENDENCY * 0.01 * step * sign;
        state.velocity = Quat::from_rotation_y(angle) * state.velocity;

        state.position += state.velocity * step;

        self.tumble += TUMBLE_SPEED * step;

        state.acceleration = Vec3::ZERO;
        state.age += 1;
        self.previous_velocity = state.velocity;
    }

    /// Current behavior parameters.
    #[inline]
    pub fn params(&self) -> BehaviorParams {
        self.params
    }

    /// Replace the behavior parameter set (live tuning).
    #[inline]
    pub fn set_params(&mut self, params: BehaviorParams) {
        self.params = params;
    }

    /// Accumulated tumble angle in radians, for rendering orientation only.
    #[inline]
    pub fn tumble_rotation(&self) -> f32 {
        self.tumble
    }

    /// Render snapshot of this agent.
    pub fn instance(&self) -> AgentInstance {
        AgentInstance {
            position: self.state.position.to_array(),
            tumble: self.tumble,
            velocity: self.state.velocity.to_array(),
            age: self.state.age as f32,
        }
    }
}
