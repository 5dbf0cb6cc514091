use crate::data::coord::Coord;
use serde::{Deserialize, Serialize};

/// Number of Moore-neighborhood offsets around a voxel.
pub const NEIGHBOR_COUNT: usize = 26;

/// What a voxel is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Medium {
    /// Open water. Carries sound and can host a navigator.
    #[default]
    Water,
    /// Submerged ground carved from the elevation data.
    Terrain,
    /// The emitter. Blocks paths like terrain but holds the source intensity.
    Source,
}

impl Medium {
    #[inline]
    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(self, Medium::Water)
    }
}

/// A single voxel of the pool.
///
/// `neighbors[i]` is the flat index of the cell reached through the i-th
/// Moore offset, or `None` when that offset leaves the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: Coord,
    pub medium: Medium,
    intensity: Option<f64>,
    pub neighbors: [Option<u32>; NEIGHBOR_COUNT],
}

impl Cell {
    #[must_use]
    pub fn water(coord: Coord) -> Self {
        Self {
            coord,
            medium: Medium::Water,
            intensity: None,
            neighbors: [None; NEIGHBOR_COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_water(&self) -> bool {
        self.medium.is_water()
    }

    #[inline]
    #[must_use]
    pub fn intensity(&self) -> Option<f64> {
        self.intensity
    }

    /// Records the intensity unless one is already present.
    ///
    /// Returns `false` and leaves the cell untouched on a second write.
    pub fn set_intensity(&mut self, value: f64) -> bool {
        if self.intensity.is_some() {
            return false;
        }
        self.intensity = Some(value);
        true
    }

    pub fn clear_intensity(&mut self) {
        self.intensity = None;
    }

    /// Iterates the defined neighbor indices in offset order.
    pub fn neighbor_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().flatten().map(|&idx| idx as usize)
    }

    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }
}
