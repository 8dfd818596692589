//! Musical forces: the six-knob control vocabulary of the system.
//!
//! The forces are abstract, normalized controls - harmony, flow, density,
//! space depth, rhythm, timbre - that mediate between musical intent (a
//! slider, or the audio feature extractor) and concrete simulation
//! parameters. The interpreter maps them two ways:
//!
//! - **Flocking mode**: [`MusicalForces::behavior_params`] produces
//!   [`BehaviorParams`] with fixed formulas (harmony balances cohesion
//!   against separation, flow trades alignment against force caps, density
//!   trades speed against personal space, space depth widens perception).
//!   Rhythm separately selects a formation shape and its strength.
//! - **Field mode**: [`MusicalForces::wave_params`] passes the six values
//!   straight through as [`WaveParams`]; the wave field interprets them
//!   itself.
//!
//! The formulas are design contracts, not tunables - they define how the
//! system "hears" the forces.

use crate::agent::BehaviorParams;
use crate::behaviors::ShapeType;
use crate::field::WaveParams;

/// The six normalized musical forces, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MusicalForces {
    /// 0 = dissonant/repulsion, 1 = consonant/attraction.
    pub harmony: f32,
    /// 0 = staccato/jerky, 1 = legato/smooth.
    pub flow: f32,
    /// 0 = sparse, 1 = dense clustering.
    pub density: f32,
    /// 0 = flat/2D, 1 = deep/3D.
    pub space_depth: f32,
    /// 0 = drone/continuous, 1 = pulsing/rhythmic.
    pub rhythm: f32,
    /// 0 = dark/soft/round, 1 = bright/sharp/angular.
    pub timbre: f32,
}

impl Default for MusicalForces {
    /// Balanced, flowing aesthetic: slightly consonant, mostly legato,
    /// medium density, moderate depth, subtle pulse.
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

impl MusicalForces {
    /// Interpret the forces as flocking behavior parameters.
    pub fn behavior_params(&self) -> BehaviorParams {
        // Harmony: attraction vs repulsion balance. Consonance pulls the
        // flock together; dissonance scatters it, with a floor so agents
        // never fully overlap.
        let cohesion_strength = self.harmony * 2.0;
        let separation_strength = (1.0 - self.harmony) * 1.5 + 0.3;

        // Flow: legato = unified smooth motion
        let alignment_strength = self.flow * 2.0;

        // Density: sparse = faster, more personal space
        let max_speed = 2.0 + (1.0 - self.density) * 6.0;
        let separation_radius = 15.0 + (1.0 - self.density) * 35.0;

        // Flow also caps acceleration: staccato turns sharply, legato
        // carves gradual arcs
        let max_force = if self.flow < 0.5 {
            0.15 + (0.5 - self.flow) * 0.3
        } else {
            0.05 + (1.0 - self.flow) * 0.1
        };

        // Space depth: deep space = agents react to distant neighbors
        let perception_radius = 60.0 + self.space_depth * 120.0;

        BehaviorParams {
            cohesion_strength,
            alignment_strength,
            separation_strength,
            max_speed,
            max_force,
            perception_radius,
            separation_radius,
        }
    }

    /// Interpret the forces as wave-field parameters (field mode).
    ///
    /// The wave field speaks the same six-parameter vocabulary, so this is
    /// a direct handoff.
    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            harmony: self.harmony,
            flow: self.flow,
            density: self.density,
            space_depth: self.space_depth,
            rhythm: self.rhythm,
            timbre: self.timbre,
        }
    }

    /// Formation shape selected by the rhythm force.
    #[inline]
    pub fn shape(&self) -> Option<ShapeType> {
        shape_from_rhythm(self.rhythm)
    }

    /// Strength of the formation attraction at the current rhythm.
    #[inline]
    pub fn shape_strength(&self) -> f32 {
        shape_strength(self.rhythm)
    }
}

/// Which shape to form at a given rhythm level.
///
/// A step function: drones form nothing, light pulses a circle, moderate
/// pulses a figure-eight, strong pulses a sphere, maximum pulses a helix.
/// Boundary values land in the upper bucket.
pub fn shape_from_rhythm(rhythm: f32) -> Option<ShapeType> {
    if rhythm < 0.3 {
        None
    } else if rhythm < 0.5 {
        Some(ShapeType::Circle)
    } else if rhythm < 0.7 {
        Some(ShapeType::FigureEight)
    } else if rhythm < 0.85 {
        Some(ShapeType::Sphere)
    } else {
        Some(ShapeType::Helix)
    }
}

/// Shape attraction strength as a continuous ramp from the shape onset.
pub fn shape_strength(rhythm: f32) -> f32 {
    if rhythm < 0.3 {
        return 0.0;
    }
    (rhythm - 0.3) * 0.15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_selection_is_step_function() {
        assert_eq!(shape_from_rhythm(0.29), None);
        assert_eq!(shape_from_rhythm(0.3), Some(ShapeType::Circle));
        assert_eq!(shape_from_rhythm(0.5), Some(ShapeType::FigureEight));
        assert_eq!(shape_from_rhythm(0.69), Some(ShapeType::FigureEight));
        assert_eq!(shape_from_rhythm(0.7), Some(ShapeType::Sphere));
        assert_eq!(shape_from_rhythm(0.86), Some(ShapeType::Helix));
        assert_eq!(shape_from_rhythm(1.0), Some(ShapeType::Helix));
    }

    #[test]
    fn test_shape_strength_ramp() {
        assert_eq!(shape_strength(0.0), 0.0);
        assert_eq!(shape_strength(0.29), 0.0);
        assert!((shape_strength(0.3) - 0.0).abs() < 0.001);
        assert!((shape_strength(0.5) - 0.03).abs() < 0.001);
        assert!((shape_strength(1.0) - 0.105).abs() < 0.001);
    }

    #[test]
    fn test_harmony_balances_cohesion_and_separation() {
        let consonant = MusicalForces {
            harmony: 1.0,
            ..MusicalForces::default()
        }
        .behavior_params();
        let dissonant = MusicalForces {
            harmony: 0.0,
            ..MusicalForces::default()
        }
        .behavior_params();

        assert!((consonant.cohesion_strength - 2.0).abs() < 0.001);
        assert!((consonant.separation_strength - 0.3).abs() < 0.001);
        assert!((dissonant.cohesion_strength - 0.0).abs() < 0.001);
        assert!((dissonant.separation_strength - 1.8).abs() < 0.001);
    }

    #[test]
    fn test_flow_switches_force_regimes() {
        let staccato = MusicalForces {
            flow: 0.0,
            ..MusicalForces::default()
        }
        .behavior_params();
        let legato = MusicalForces {
            flow: 1.0,
            ..MusicalForces::default()
        }
        .behavior_params();

        assert!((staccato.max_force - 0.3).abs() < 0.001);
        assert!((legato.max_force - 0.05).abs() < 0.001);
        assert!(staccato.alignment_strength < legato.alignment_strength);
    }

    #[test]
    fn test_density_trades_speed_for_space() {
        let sparse = MusicalForces {
            density: 0.0,
            ..MusicalForces::default()
        }
        .behavior_params();
        let dense = MusicalForces {
            density: 1.0,
            ..MusicalForces::default()
        }
        .behavior_params();

        assert!((sparse.max_speed - 8.0).abs() < 0.001);
        assert!((sparse.separation_radius - 50.0).abs() < 0.001);
        assert!((dense.max_speed - 2.0).abs() < 0.001);
        assert!((dense.separation_radius - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_space_depth_widens_perception() {
        let flat = MusicalForces {
            space_depth: 0.0,
            ..MusicalForces::default()
        }
        .behavior_params();
        let deep = MusicalForces {
            space_depth: 1.0,
            ..MusicalForces::default()
        }
        .behavior_params();

        assert!((flat.perception_radius - 60.0).abs() < 0.001);
        assert!((deep.perception_radius - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_wave_params_pass_through() {
        let forces = MusicalForces {
            harmony: 0.1,
            flow: 0.2,
            density: 0.3,
            space_depth: 0.4,
            rhythm: 0.5,
            timbre: 0.6,
        };
        let params = forces.wave_params();
        assert!((params.harmony - 0.1).abs() < 0.001);
        assert!((params.flow - 0.2).abs() < 0.001);
        assert!((params.density - 0.3).abs() < 0.001);
        assert!((params.space_depth - 0.4).abs() < 0.001);
        assert!((params.rhythm - 0.5).abs() < 0.001);
        assert!((params.timbre - 0.6).abs() < 0.001);
    }
}
