//! Uniform hash grid for neighbor queries.
//!
//! Flocking is O(n²) with naive pairwise checks. The grid discretizes space
//! into cells of `cell_size` (set to the perception radius) so a query only
//! scans the 3×3×3 block of cells around the query point, then post-filters
//! candidates by exact squared distance. As long as the query radius does
//! not exceed the cell size, the result set is exact: no false negatives
//! from the block scan, no false positives past the distance filter.
//!
//! The grid is transient: rebuilt (cleared and reinserted) every tick from
//! the current agent states, never incrementally updated. Because it stores
//! copies of [`AgentState`], the rebuilt grid doubles as the consistent
//! previous-tick snapshot all agents read during one update pass.

use crate::agent::{AgentId, AgentState, Neighbor};
use glam::Vec3;
use std::collections::HashMap;

/// Cell coordinates are packed into 21 bits per axis, which covers roughly
/// ±1M cells from the origin — far beyond any plausible world size here.
const AXIS_BITS: u64 = 21;
const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;

#[inline]
fn pack_key(x: i64, y: i64, z: i64) -> u64 {
    ((x as u64 & AXIS_MASK) << (2 * AXIS_BITS))
        | ((y as u64 & AXIS_MASK) << AXIS_BITS)
        | (z as u64 & AXIS_MASK)
}

/// Uniform 3D hash grid over agent states.
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<u64, Vec<AgentState>>,
}

impl SpatialGrid {
    /// Create a grid with the given cell size.
    ///
    /// Cell size should equal the largest query radius, so a correct query
    /// never needs more than the 27 surrounding cells.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "Grid cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Current cell size.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change the cell size, discarding all current contents.
    ///
    /// Cell membership depends on the cell size, so the grid must be
    /// reinserted from scratch afterwards.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        assert!(cell_size > 0.0, "Grid cell size must be positive");
        self.cell_size = cell_size;
        self.cells.clear();
    }

    /// Empty all cells.
    ///
    /// Cell vectors keep their allocations so a per-tick rebuild does not
    /// reallocate the whole structure.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Insert a copy of an agent's state into its cell.
    pub fn insert(&mut self, agent: &AgentState) {
        let (x, y, z) = self.cell_of(agent.position);
        self.cells.entry(pack_key(x, y, z)).or_default().push(*agent);
    }

    /// All agents within `radius` of `position`, excluding `exclude`.
    ///
    /// Scans the 27 cells around the query point and filters by exact
    /// squared Euclidean distance, returning each match paired with its
    /// distance.
    pub fn query(&self, position: Vec3, radius: f32, exclude: AgentId) -> Vec<Neighbor> {
        let (cx, cy, cz) = self.cell_of(position);
        let radius_sq = radius * radius;
        let mut results = Vec::new();

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&pack_key(cx + dx, cy + dy, cz + dz))
                    else {
                        continue;
                    };

                    for agent in bucket {
                        if agent.id == exclude {
                            continue;
                        }
                        let dist_sq = agent.position.distance_squared(position);
                        if dist_sq <= radius_sq {
                            results.push(Neighbor {
                                state: *agent,
                                distance: dist_sq.sqrt(),
                            });
                        }
                    }
                }
            }
        }

        results
    }

    #[inline]
    fn cell_of(&self, position: Vec3) -> (i64, i64, i64) {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
            (position.z / self.cell_size).floor() as i64,
        )
    }
}
