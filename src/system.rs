//! Agent system: owns the flock and orchestrates the tick.
//!
//! One [`update`](AgentSystem::update) call is one tick: rebuild the
//! spatial grid from current positions, query neighbors for every agent
//! against that consistent snapshot, accumulate flocking + containment +
//! any enabled auxiliary forces (wave field, formation shape, rhythmic
//! pulse), then integrate. The whole simulation is single-threaded and
//! frame-driven; nothing here blocks or suspends inside a tick.

use crate::agent::{AgentId, AgentInstance, BehaviorParams, LineAgent};
use crate::behaviors::{self, ShapeType};
use crate::field::{WaveField, WaveParams};
use crate::forces::MusicalForces;
use crate::spatial::SpatialGrid;
use crate::spawn::SpawnContext;
use crate::time::MAX_DELTA;
use glam::Vec3;

/// Wave displacements are renderer-scale (tens of units); this converts
/// them into steering-scale forces so a strength of 1.0 lands in the same
/// range as the flocking force caps.
const WAVE_FORCE_SCALE: f32 = 0.002;

/// Population and world configuration.
#[derive(Clone, Copy, Debug)]
pub struct SystemConfig {
    /// Hard cap on the agent population.
    pub max_agents: usize,
    /// Agents spawned at construction.
    pub initial_count: usize,
    /// World extents; containment uses a sphere of radius half the
    /// smallest axis.
    pub bounds: Vec3,
}

impl Default for SystemConfig {
    /// Murmuration-density defaults in a large space.
    fn default() -> Self {
        Self {
            max_agents: 1000,
            initial_count: 300,
            bounds: Vec3::splat(500.0),
        }
    }
}

/// The flocking simulation: agent population, spatial index, and the
/// auxiliary force toggles.
pub struct AgentSystem {
    agents: Vec<LineAgent>,
    config: SystemConfig,
    params: BehaviorParams,
    grid: SpatialGrid,
    next_id: u32,
    time: f32,
    shape: Option<ShapeType>,
    shape_strength: f32,
    pulse_strength: f32,
    wave: Option<(WaveField, f32)>,
}

impl AgentSystem {
    /// Create a system and spawn its initial population.
    ///
    /// Grid cell size is tied to the perception radius so neighbor queries
    /// never need to scan beyond the 27 surrounding cells.
    pub fn new(config: SystemConfig, params: BehaviorParams) -> Self {
        let mut system = Self {
            agents: Vec::with_capacity(config.initial_count),
            config,
            params,
            grid: SpatialGrid::new(params.perception_radius),
            next_id: 0,
            time: 0.0,
            shape: None,
            shape_strength: 0.0,
            pulse_strength: 0.0,
            wave: None,
        };
        system.spawn(config.initial_count);
        system
    }

    /// Spawn up to `count` new agents, respecting the population cap.
    ///
    /// Positions are uniform inside a sphere of radius one third of the
    /// smallest bound axis; initial headings are uniform with speeds in
    /// 0.5-2.
    pub fn spawn(&mut self, count: usize) {
        self.spawn_biased(count, Vec3::ZERO);
    }

    /// Spawn up to `count` new agents with initial headings pulled toward
    /// `bias`.
    ///
    /// The bias is added to each agent's random unit heading before the
    /// speed is applied, so a unit-length bias roughly halves the angular
    /// spread and a longer one aligns the batch tighter. Zero bias is a
    /// plain uniform spawn.
    pub fn spawn_biased(&mut self, count: usize, bias: Vec3) {
        let available = self.config.max_agents.saturating_sub(self.agents.len());
        let count = count.min(available);
        let spawn_radius = self.config.bounds.min_element() / 3.0;

        for i in 0..count {
            let mut ctx = SpawnContext::new(i as u32, count as u32);
            let id = AgentId(self.next_id);
            self.next_id += 1;

            let position = ctx.random_in_sphere(spawn_radius);
            let heading = (ctx.random_direction() + bias).normalize_or_zero();
            let velocity = heading * ctx.random_range(0.5, 2.0);
            self.agents
                .push(LineAgent::new(id, position, velocity, self.params));
        }
    }

    /// Remove up to `count` agents. Which agents go is unspecified.
    pub fn remove(&mut self, count: usize) {
        let count = count.min(self.agents.len());
        self.agents.drain(..count);
    }

    /// Advance the whole flock by one tick.
    ///
    /// `dt` is wall-clock seconds since the previous tick, clamped to
    /// [`MAX_DELTA`].
    pub fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_DELTA);
        self.time += dt;

        // Rebuild the spatial index; it becomes this tick's consistent
        // previous-tick snapshot for every neighbor query
        self.grid.clear();
        for agent in &self.agents {
            self.grid.insert(&agent.state);
        }

        let bounds = self.config.bounds;
        let perception = self.params.perception_radius;
        let time = self.time;

        for agent in &mut self.agents {
            let neighbors = self
                .grid
                .query(agent.state.position, perception, agent.state.id);

            agent.flock(&neighbors);
            agent.constrain(bounds);

            if let Some(shape) = self.shape {
                let force =
                    behaviors::shape_attraction(&agent.state, shape, self.shape_strength);
                agent.apply_force(force);
            }
            if self.pulse_strength > 0.0 {
                let force = behaviors::rhythmic_pulse(&agent.state, time, self.pulse_strength);
                agent.apply_force(force);
            }
            if let Some((field, strength)) = &self.wave {
                let displacement = field.sample(agent.state.position, time);
                agent.apply_force(displacement * (strength * WAVE_FORCE_SCALE));
            }

            agent.update(dt);
        }
    }

    /// Current behavior parameters.
    #[inline]
    pub fn params(&self) -> BehaviorParams {
        self.params
    }

    /// Replace the behavior parameters and propagate them to every agent.
    ///
    /// A perception-radius change re-sizes the grid cells, since cell size
    /// is tied to it; the grid rebuilds from scratch on the next tick.
    pub fn set_params(&mut self, params: BehaviorParams) {
        if params.perception_radius != self.params.perception_radius {
            self.grid.set_cell_size(params.perception_radius);
        }
        self.params = params;
        for agent in &mut self.agents {
            agent.set_params(params);
        }
    }

    /// Enable or disable the formation-shape attraction.
    pub fn set_shape(&mut self, shape: Option<ShapeType>, strength: f32) {
        self.shape = shape;
        self.shape_strength = strength;
    }

    /// Set the rhythmic pulse strength. Zero disables the pulse.
    pub fn set_pulse(&mut self, strength: f32) {
        self.pulse_strength = strength;
    }

    /// Couple the flock to a wave field, or decouple it with `None`.
    ///
    /// Each tick every agent samples the field at its own position and the
    /// displacement is folded into its steering at `strength`.
    pub fn set_wave_influence(&mut self, influence: Option<(WaveParams, f32)>) {
        self.wave = influence.map(|(params, strength)| (WaveField::new(params), strength));
    }

    /// Apply a full set of musical forces: behavior parameters plus the
    /// rhythm-selected formation shape.
    pub fn apply_musical_forces(&mut self, forces: &MusicalForces) {
        self.set_params(forces.behavior_params());
        self.set_shape(forces.shape(), forces.shape_strength());
    }

    /// The agent population, for per-frame read-only access.
    #[inline]
    pub fn agents(&self) -> &[LineAgent] {
        &self.agents
    }

    /// Current population size.
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Render snapshots of the whole population.
    pub fn instances(&self) -> Vec<AgentInstance> {
        self.agents.iter().map(LineAgent::instance).collect()
    }

    /// Accumulated simulation time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }
}
