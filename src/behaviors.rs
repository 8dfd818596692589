//! Steering behaviors for line agents.
//!
//! Every function here is pure: it takes an agent's state, usually its
//! neighbor set, and one or two scalars, and returns a capped steering
//! force without mutating anything. Forces follow the classic
//! desired-minus-current shape: compute a desired velocity, subtract the
//! current velocity, cap the result at the behavior's strength.
//!
//! # Behavior Categories
//!
//! - **Flocking** (neighbor): [`cohesion`], [`alignment`], [`separation`]
//! - **Containment**: [`bound_sphere`]
//! - **Formation**: [`shape_attraction`] with a [`ShapeType`] target curve
//! - **Modulation**: [`rhythmic_pulse`]
//!
//! The one recurring numeric hazard is normalizing a zero-length vector;
//! the policy throughout is to short-circuit and return the zero vector.

use crate::agent::{AgentState, Neighbor};
use crate::math;
use glam::Vec3;
use std::f32::consts::TAU;

/// Radius of the parametric formation curves.
const FORMATION_RADIUS: f32 = 150.0;

/// Distance from the shape target at which arrival deceleration begins.
const ARRIVE_RADIUS: f32 = 30.0;

/// Pulse propagation speed, in cycles per second of global time.
const PULSE_SPEED: f32 = 0.5;

/// Peak magnitude of the pulse displacement force.
const PULSE_MAGNITUDE: f32 = 2.0;

/// Radians of pulse phase per world unit of radial distance. This spatial
/// term is what makes the pulse travel outward as a wave instead of firing
/// every agent in unison.
const PULSE_WAVE_NUMBER: f32 = 0.02;

/// Formation shapes agents can be steered onto.
///
/// Selected from the rhythm force by
/// [`shape_from_rhythm`](crate::forces::shape_from_rhythm).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeType {
    /// Flat ring in the XZ plane.
    Circle,
    /// Figure-eight (lemniscate) in the XZ plane.
    FigureEight,
    /// Points distributed over a sphere surface.
    Sphere,
    /// Rising spiral around the Y axis.
    Helix,
}

/// Steer toward a desired direction at the agent's current speed, capped at
/// `strength`. Zero-length desired directions produce zero force.
fn steer(agent: &AgentState, desired: Vec3, strength: f32) -> Vec3 {
    if desired.length_squared() <= f32::EPSILON {
        return Vec3::ZERO;
    }
    let desired = math::with_magnitude(desired, agent.velocity.length());
    math::limit(desired - agent.velocity, strength)
}

/// Cohesion: steer toward the average position of neighbors.
pub fn cohesion(agent: &AgentState, neighbors: &[Neighbor], strength: f32) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }

    let mut center = Vec3::ZERO;
    for neighbor in neighbors {
        center += neighbor.state.position;
    }
    center /= neighbors.len() as f32;

    steer(agent, center - agent.position, strength)
}

/// Alignment: match the average velocity of neighbors.
pub fn alignment(agent: &AgentState, neighbors: &[Neighbor], strength: f32) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }

    let mut average = Vec3::ZERO;
    for neighbor in neighbors {
        average += neighbor.state.velocity;
    }
    average /= neighbors.len() as f32;

    steer(agent, average, strength)
}

/// Separation: steer away from neighbors inside the separation radius,
/// weighted inversely by distance (closer = stronger push).
pub fn separation(
    agent: &AgentState,
    neighbors: &[Neighbor],
    strength: f32,
    separation_radius: f32,
) -> Vec3 {
    let mut away = Vec3::ZERO;
    let mut count = 0;

    for neighbor in neighbors {
        if neighbor.distance < separation_radius && neighbor.distance > 0.0 {
            let diff = (agent.position - neighbor.state.position).normalize_or_zero()
                / neighbor.distance;
            away += diff;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }
    away /= count as f32;

    steer(agent, away, strength)
}

/// Soft spherical containment around the world origin.
///
/// Inside the bound radius the force is zero. Outside, the agent is steered
/// back toward the center with strength scaled by `1 + overflow`, where
/// overflow is the fractional distance past the boundary — the force grows
/// without bound the further out the agent drifts.
pub fn bound_sphere(agent: &AgentState, radius: f32, strength: f32) -> Vec3 {
    let distance = agent.position.length();
    if distance <= radius {
        return Vec3::ZERO;
    }

    let overflow = (distance - radius) / radius;
    steer(agent, -agent.position, strength * (1.0 + overflow))
}

/// Steer toward a deterministic per-agent point on a formation curve.
///
/// The target phase comes from the agent's id (spread around the curve by a
/// golden-ratio multiple, so agents distribute smoothly instead of
/// bunching) plus a slow age drift that keeps the formation circulating.
/// Inside [`ARRIVE_RADIUS`] of the target the desired speed ramps down
/// linearly so agents settle onto the curve instead of orbiting past it.
pub fn shape_attraction(agent: &AgentState, shape: ShapeType, strength: f32) -> Vec3 {
    let target = shape_target(shape, agent);
    let to_target = target - agent.position;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return Vec3::ZERO;
    }

    let speed = agent.velocity.length();
    let desired_speed = if distance < ARRIVE_RADIUS {
        speed * (distance / ARRIVE_RADIUS)
    } else {
        speed
    };

    math::limit(
        math::with_magnitude(to_target, desired_speed) - agent.velocity,
        strength,
    )
}

/// The agent's personal target point on the given curve.
fn shape_target(shape: ShapeType, agent: &AgentState) -> Vec3 {
    // Golden-ratio fractional spacing: consecutive ids land far apart on
    // the curve, any population size spreads evenly
    const GOLDEN: f32 = 0.618_034;
    let t = (agent.id.raw() as f32 * GOLDEN).fract();
    let theta = t * TAU + agent.age as f32 * 0.001;
    let r = FORMATION_RADIUS;

    match shape {
        ShapeType::Circle => Vec3::new(r * theta.cos(), 0.0, r * theta.sin()),
        ShapeType::FigureEight => {
            Vec3::new(r * theta.sin(), 0.0, r * theta.sin() * theta.cos())
        }
        ShapeType::Sphere => {
            // Second irrational stride decorrelates latitude from longitude
            let y = 1.0 - 2.0 * (agent.id.raw() as f32 * 0.414_214).fract();
            let ring = (1.0 - y * y).max(0.0).sqrt();
            Vec3::new(r * ring * theta.cos(), r * y, r * ring * theta.sin())
        }
        ShapeType::Helix => {
            let turns = theta * 3.0;
            Vec3::new(r * turns.cos(), (t - 0.5) * 2.0 * r, r * turns.sin())
        }
    }
}

/// Periodic radial force that propagates outward as a traveling wave.
///
/// Phase couples global time with the agent's radial distance, so the
/// pulse visibly sweeps through the flock rather than firing all agents at
/// once. Agents at the exact origin have no radial direction and receive
/// zero force.
pub fn rhythmic_pulse(agent: &AgentState, time: f32, strength: f32) -> Vec3 {
    let outward = agent.position.normalize_or_zero();
    if outward == Vec3::ZERO {
        return Vec3::ZERO;
    }

    let phase = time * TAU * PULSE_SPEED - agent.position.length() * PULSE_WAVE_NUMBER;
    outward * (phase.sin() * PULSE_MAGNITUDE * strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;

    fn state(id: u32, position: Vec3, velocity: Vec3) -> AgentState {
        AgentState {
            id: AgentId(id),
            position,
            velocity,
            acceleration: Vec3::ZERO,
            age: 0,
        }
    }

    fn neighbor(id: u32, position: Vec3, velocity: Vec3, from: Vec3) -> Neighbor {
        Neighbor {
            state: state(id, position, velocity),
            distance: position.distance(from),
        }
    }

    #[test]
    fn test_cohesion_zero_neighbors_zero_force() {
        let agent = state(0, Vec3::ZERO, Vec3::X);
        assert_eq!(cohesion(&agent, &[], 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_cohesion_pulls_toward_center() {
        let agent = state(0, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let neighbors = [neighbor(1, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO)];
        let force = cohesion(&agent, &neighbors, 1.0);
        assert!(force.x > 0.0);
        assert!(force.length() <= 1.0 + 0.001);
    }

    #[test]
    fn test_alignment_zero_neighbors_zero_force() {
        let agent = state(0, Vec3::ZERO, Vec3::X);
        assert_eq!(alignment(&agent, &[], 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_alignment_matches_neighbor_heading() {
        let agent = state(0, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let neighbors = [neighbor(
            1,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
        )];
        let force = alignment(&agent, &neighbors, 1.5);
        assert!(force.z > 0.0);
        assert!(force.length() <= 1.5 + 0.001);
    }

    #[test]
    fn test_alignment_stationary_neighbors_zero_force() {
        // All-zero average velocity has no direction to steer along
        let agent = state(0, Vec3::ZERO, Vec3::X);
        let neighbors = [neighbor(1, Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO)];
        assert_eq!(alignment(&agent, &neighbors, 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_separation_ignores_distant_neighbors() {
        let agent = state(0, Vec3::ZERO, Vec3::X);
        let neighbors = [neighbor(1, Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO)];
        assert_eq!(separation(&agent, &neighbors, 1.0, 25.0), Vec3::ZERO);
    }

    #[test]
    fn test_separation_pushes_away_from_close_neighbor() {
        let agent = state(0, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let neighbors = [neighbor(1, Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO)];
        let force = separation(&agent, &neighbors, 1.0, 25.0);
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_separation_skips_coincident_neighbor() {
        // Distance 0 would divide by zero; such neighbors must not qualify
        let agent = state(0, Vec3::ZERO, Vec3::X);
        let neighbors = [Neighbor {
            state: state(1, Vec3::ZERO, Vec3::ZERO),
            distance: 0.0,
        }];
        assert_eq!(separation(&agent, &neighbors, 1.0, 25.0), Vec3::ZERO);
    }

    #[test]
    fn test_bound_sphere_inside_is_zero() {
        let agent = state(0, Vec3::new(50.0, 0.0, 0.0), Vec3::X);
        assert_eq!(bound_sphere(&agent, 100.0, 0.5), Vec3::ZERO);
    }

    #[test]
    fn test_bound_sphere_grows_with_overflow() {
        let near = state(0, Vec3::new(110.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let far = state(0, Vec3::new(300.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let near_force = bound_sphere(&near, 100.0, 0.5);
        let far_force = bound_sphere(&far, 100.0, 0.5);
        assert!(near_force.x < 0.0);
        assert!(far_force.length() > near_force.length());
    }

    #[test]
    fn test_shape_targets_are_deterministic() {
        let agent = state(17, Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        for shape in [
            ShapeType::Circle,
            ShapeType::FigureEight,
            ShapeType::Sphere,
            ShapeType::Helix,
        ] {
            let a = shape_attraction(&agent, shape, 0.1);
            let b = shape_attraction(&agent, shape, 0.1);
            assert_eq!(a, b);
            assert!(a.length() <= 0.1 + 0.001);
        }
    }

    #[test]
    fn test_shape_targets_differ_between_agents() {
        let a = state(1, Vec3::ZERO, Vec3::X);
        let b = state(2, Vec3::ZERO, Vec3::X);
        assert_ne!(
            shape_target(ShapeType::Circle, &a),
            shape_target(ShapeType::Circle, &b)
        );
    }

    #[test]
    fn test_sphere_targets_lie_on_sphere() {
        for id in 0..32 {
            let agent = state(id, Vec3::ZERO, Vec3::X);
            let target = shape_target(ShapeType::Sphere, &agent);
            assert!((target.length() - FORMATION_RADIUS).abs() < 0.1);
        }
    }

    #[test]
    fn test_rhythmic_pulse_is_radial() {
        let agent = state(0, Vec3::new(40.0, 0.0, 0.0), Vec3::X);
        let force = rhythmic_pulse(&agent, 0.3, 1.0);
        // Force lies along the position axis, either inward or outward
        assert!(force.y.abs() < 0.001);
        assert!(force.z.abs() < 0.001);
    }

    #[test]
    fn test_rhythmic_pulse_at_origin_is_zero() {
        let agent = state(0, Vec3::ZERO, Vec3::X);
        assert_eq!(rhythmic_pulse(&agent, 1.0, 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_rhythmic_pulse_travels_with_distance() {
        // Different radii see different phases at the same instant
        let near = state(0, Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        let far = state(0, Vec3::new(160.0, 0.0, 0.0), Vec3::X);
        let near_force = rhythmic_pulse(&near, 0.5, 1.0);
        let far_force = rhythmic_pulse(&far, 0.5, 1.0);
        assert!((near_force.x - far_force.x).abs() > 0.01);
    }
}
