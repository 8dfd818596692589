//! Integration tests for the full simulation pipeline.
//!
//! These exercise the public contract end to end: long flocking runs stay
//! numerically sane, the spatial grid matches brute force at scale, and
//! audio features flow through the interpreter into both simulation modes.

use resona::prelude::*;
use resona::{shape_from_rhythm, Vec3, MAX_DELTA};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_flock_survives_long_run() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 200,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );

    for _ in 0..100 {
        system.update(DT);
    }

    assert_eq!(system.len(), 200);
    for agent in system.agents() {
        assert!(agent.state.position.is_finite());
        assert!(agent.state.velocity.is_finite());
        assert_eq!(agent.state.age, 100);
    }
}

#[test]
fn test_flock_respects_speed_limit_under_all_forces() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 100,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );
    system.set_shape(Some(ShapeType::Sphere), 0.1);
    system.set_pulse(0.5);
    system.set_wave_influence(Some((WaveParams::default(), 1.0)));

    for _ in 0..60 {
        system.update(DT);
    }

    let max_speed = system.params().max_speed;
    for agent in system.agents() {
        assert!(agent.state.velocity.length() <= max_speed + 0.001);
    }
}

#[test]
fn test_flock_stays_loosely_contained() {
    let bounds = Vec3::splat(500.0);
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 150,
            bounds,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );

    for _ in 0..600 {
        system.update(DT);
    }

    // Containment is soft: agents may poke past the bound radius, but the
    // unbounded restoring force keeps the flock from escaping outright
    let bound_radius = bounds.min_element() / 2.0;
    for agent in system.agents() {
        assert!(agent.state.position.length() < bound_radius * 2.0);
    }
}

#[test]
fn test_population_resize_mid_run() {
    let mut system = AgentSystem::new(SystemConfig::default(), BehaviorParams::default());
    let initial = system.len();

    for _ in 0..10 {
        system.update(DT);
    }
    system.spawn(100);
    for _ in 0..10 {
        system.update(DT);
    }
    system.remove(250);
    for _ in 0..10 {
        system.update(DT);
    }

    assert_eq!(system.len(), initial + 100 - 250);
    for agent in system.agents() {
        assert!(agent.state.position.is_finite());
    }
}

#[test]
fn test_live_param_swap_keeps_grid_consistent() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 80,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );

    for _ in 0..20 {
        system.update(DT);
    }

    // Shrink perception drastically; grid cell size follows it
    system.set_params(BehaviorParams {
        perception_radius: 40.0,
        separation_radius: 10.0,
        ..system.params()
    });

    for _ in 0..20 {
        system.update(DT);
    }

    for agent in system.agents() {
        assert!(agent.state.position.is_finite());
        assert!((agent.params().perception_radius - 40.0).abs() < 0.001);
    }
}

#[test]
fn test_wave_system_long_run_is_finite() {
    let mut waves = WaveSystem::new(100, WaveParams::default(), Vec3::splat(500.0));

    for _ in 0..300 {
        waves.update(DT);
    }

    for tracer in waves.tracers() {
        assert!(tracer.position.is_finite());
        for point in tracer.path() {
            assert!(point.is_finite());
        }
    }
}

#[test]
fn test_audio_drives_field_mode() {
    let mut extractor = FeatureExtractor::new(64);
    let mut waves = WaveSystem::new(40, WaveParams::default(), Vec3::splat(400.0));

    // A bright, loud spectrum: energy weighted toward high bins
    let mut spectrum = vec![0u8; 64];
    for (i, bin) in spectrum.iter_mut().enumerate() {
        *bin = (i * 4).min(255) as u8;
    }

    for _ in 0..30 {
        let features = extractor.extract_smoothed(&spectrum);
        waves.set_params(extractor.wave_params(&features));
        waves.update(DT);
    }

    let params = waves.params();
    // Bright audio maps to high timbre and low flow
    assert!(params.timbre > 0.5);
    assert!(params.flow < 0.5);
    assert!((params.timbre + params.flow - 1.0).abs() < 0.001);
    for tracer in waves.tracers() {
        assert!(tracer.position.is_finite());
    }
}

#[test]
fn test_musical_forces_drive_flocking_mode() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 60,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );

    let forces = MusicalForces {
        harmony: 0.9,
        flow: 0.8,
        density: 0.7,
        space_depth: 0.2,
        rhythm: 0.75,
        timbre: 0.5,
    };
    system.apply_musical_forces(&forces);

    // The interpreter's formulas land in the live parameter set
    let params = system.params();
    assert!((params.cohesion_strength - 1.8).abs() < 0.001);
    assert!((params.perception_radius - 84.0).abs() < 0.001);
    assert_eq!(shape_from_rhythm(forces.rhythm), Some(ShapeType::Sphere));

    for _ in 0..50 {
        system.update(DT);
    }
    for agent in system.agents() {
        assert!(agent.state.position.is_finite());
        assert!(agent.state.velocity.length() <= params.max_speed + 0.001);
    }
}

#[test]
fn test_stalled_frame_cannot_teleport_the_flock() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 30,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );
    system.update(DT);
    let before: Vec<Vec3> = system.agents().iter().map(|a| a.state.position).collect();

    // Simulate a multi-second stall; the delta clamp bounds the step
    system.update(5.0);

    let max_step = system.params().max_speed * MAX_DELTA * 60.0;
    for (agent, prev) in system.agents().iter().zip(&before) {
        assert!(agent.state.position.distance(*prev) <= max_step + 0.001);
    }
}

#[test]
fn test_renderer_snapshots_match_population() {
    let mut system = AgentSystem::new(
        SystemConfig {
            initial_count: 25,
            ..SystemConfig::default()
        },
        BehaviorParams::default(),
    );
    for _ in 0..5 {
        system.update(DT);
    }

    let instances = system.instances();
    assert_eq!(instances.len(), system.len());
    for (instance, agent) in instances.iter().zip(system.agents()) {
        assert_eq!(instance.position, agent.state.position.to_array());
        assert_eq!(instance.age, agent.state.age as f32);
    }

    // Instances are plain-old-data for the renderer
    let bytes: &[u8] = resona::bytemuck::cast_slice(&instances);
    assert_eq!(
        bytes.len(),
        instances.len() * std::mem::size_of::<AgentInstance>()
    );
}
