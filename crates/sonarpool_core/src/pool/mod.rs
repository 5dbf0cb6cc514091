//! The voxelized pool: a dense z-major array of cells carved from a height
//! field, with precomputed Moore adjacency.

mod obstacle;
mod placement;

pub use obstacle::ObstacleBound;

use crate::adjacency::Extent;
use crate::error::{Result, SimError};
use crate::metrics::Metrics;
use crate::propagation::PropagationMode;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sonarpool_data::{Cell, Coord, HeightField, Medium};
use std::time::Instant;

/// The placed emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSource {
    pub coord: Coord,
    pub intensity: f64,
    pub mode: PropagationMode,
}

/// Read-only overview handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub length: usize,
    pub width: usize,
    pub height: usize,
    pub water_cells: usize,
    pub terrain_cells: usize,
    pub obstacle_bound: ObstacleBound,
    pub source: Option<SoundSource>,
    pub min_water_intensity: Option<f64>,
    pub max_water_intensity: Option<f64>,
}

pub struct Pool {
    extent: Extent,
    cells: Vec<Cell>,
    source: Option<SoundSource>,
    obstacle_bound: ObstacleBound,
    metrics: Metrics,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("extent", &self.extent)
            .field("source", &self.source)
            .field("obstacle_bound", &self.obstacle_bound)
            .finish_non_exhaustive()
    }
}

impl Pool {
    /// Builds a pool of `height` layers over `field` and carves its terrain.
    ///
    /// Every cell with `z < elevation(x, y)` becomes terrain. Fails with
    /// [`SimError::Configuration`] unless `height` exceeds the tallest
    /// elevation, so that every column keeps open water on top.
    pub fn new(field: &HeightField, height: usize) -> Result<Self> {
        let max_elevation = field.max_height() as usize;
        if height <= max_elevation {
            return Err(SimError::configuration(format!(
                "pool height {height} must be greater than the tallest terrain ({max_elevation})"
            )));
        }

        let extent = Extent {
            length: field.length(),
            width: field.width(),
            height,
        };
        if extent.volume() > u32::MAX as usize {
            return Err(SimError::configuration(format!(
                "pool of {}x{}x{} cells exceeds the addressable volume",
                extent.length, extent.width, extent.height
            )));
        }

        let started = Instant::now();
        let mut cells: Vec<Cell> = (0..extent.volume())
            .into_par_iter()
            .map(|idx| Cell::water(extent.coord(idx)))
            .collect();
        tracing::info!(
            length = extent.length,
            width = extent.width,
            height = extent.height,
            "Filled pool with water"
        );

        cells
            .par_iter_mut()
            .for_each(|cell| cell.neighbors = extent.neighbors_of(cell.coord));
        tracing::info!("Linked neighboring cells");

        cells.par_iter_mut().for_each(|cell| {
            let floor = field.get(cell.coord.x, cell.coord.y) as usize;
            if cell.coord.z < floor {
                cell.medium = Medium::Terrain;
            }
        });

        let obstacle_bound = ObstacleBound::scan(&extent, &cells);
        tracing::info!(
            bound_x = obstacle_bound.x,
            bound_y = obstacle_bound.y,
            duration_ms = started.elapsed().as_millis() as u64,
            "Carved terrain"
        );

        Ok(Self {
            extent,
            cells,
            source: None,
            obstacle_bound,
            metrics: Metrics::new(),
        })
    }

    /// Builds a pool exactly one layer taller than the tallest terrain.
    pub fn with_headroom(field: &HeightField) -> Result<Self> {
        Self::new(field, field.max_height() as usize + 1)
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.extent.length
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.extent.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.extent.height
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        self.extent.contains(c)
    }

    pub fn cell(&self, c: Coord) -> Result<&Cell> {
        if !self.contains(c) {
            return Err(SimError::OutOfBounds(c));
        }
        Ok(&self.cells[self.extent.index(c)])
    }

    /// Cell by flat index, as stored in adjacency lists. `None` past the end.
    #[inline]
    #[must_use]
    pub fn cell_at(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn medium(&self, c: Coord) -> Result<Medium> {
        self.cell(c).map(|cell| cell.medium)
    }

    pub fn intensity(&self, c: Coord) -> Result<Option<f64>> {
        self.cell(c).map(Cell::intensity)
    }

    /// `false` outside the pool.
    #[inline]
    #[must_use]
    pub fn is_water(&self, c: Coord) -> bool {
        self.contains(c) && self.cells[self.extent.index(c)].is_water()
    }

    /// Defined neighbors of `c` in adjacency order.
    pub fn neighbors(&self, c: Coord) -> Result<impl Iterator<Item = &Cell> + '_> {
        let cell = self.cell(c)?;
        Ok(cell.neighbor_indices().map(move |idx| &self.cells[idx]))
    }

    #[must_use]
    pub fn source(&self) -> Option<&SoundSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn obstacle_bound(&self) -> ObstacleBound {
        self.obstacle_bound
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Coordinates of every water cell in storage order.
    pub fn water_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().filter(|c| c.is_water()).map(|c| c.coord)
    }

    #[must_use]
    pub fn summary(&self) -> PoolSummary {
        let water = self.cells.iter().filter(|c| c.is_water());
        let intensities: Vec<f64> = water.clone().filter_map(Cell::intensity).collect();
        PoolSummary {
            length: self.extent.length,
            width: self.extent.width,
            height: self.extent.height,
            water_cells: water.count(),
            terrain_cells: self
                .cells
                .iter()
                .filter(|c| c.medium == Medium::Terrain)
                .count(),
            obstacle_bound: self.obstacle_bound,
            source: self.source,
            min_water_intensity: intensities.iter().copied().reduce(f64::min),
            max_water_intensity: intensities.iter().copied().reduce(f64::max),
        }
    }

    #[inline]
    pub(crate) fn index(&self, c: Coord) -> usize {
        self.extent.index(c)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn set_source(&mut self, source: Option<SoundSource>) {
        self.source = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepped_field() -> HeightField {
        HeightField::from_rows(vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 0, 0]]).unwrap()
    }

    #[test]
    fn test_height_must_exceed_terrain() {
        let field = stepped_field();
        assert!(matches!(
            Pool::new(&field, 2),
            Err(SimError::Configuration(_))
        ));
        assert!(Pool::new(&field, 3).is_ok());
    }

    #[test]
    fn test_carving_follows_elevation() {
        let pool = Pool::new(&stepped_field(), 4).unwrap();
        assert_eq!(pool.medium(Coord::new(0, 0, 0)).unwrap(), Medium::Water);
        assert_eq!(pool.medium(Coord::new(1, 0, 0)).unwrap(), Medium::Terrain);
        assert_eq!(pool.medium(Coord::new(1, 0, 1)).unwrap(), Medium::Water);
        assert_eq!(pool.medium(Coord::new(2, 1, 1)).unwrap(), Medium::Terrain);
        assert_eq!(pool.medium(Coord::new(2, 1, 2)).unwrap(), Medium::Water);
    }

    #[test]
    fn test_with_headroom_adds_one_layer() {
        let pool = Pool::with_headroom(&stepped_field()).unwrap();
        assert_eq!(pool.height(), 3);
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let pool = Pool::new(&stepped_field(), 4).unwrap();
        assert_eq!(
            pool.cell(Coord::new(3, 0, 0)).unwrap_err(),
            SimError::OutOfBounds(Coord::new(3, 0, 0))
        );
        assert!(!pool.is_water(Coord::new(0, 0, 4)));
    }

    #[test]
    fn test_flat_index_lookup() {
        let pool = Pool::new(&stepped_field(), 4).unwrap();
        let last = pool.cells().len() - 1;
        assert_eq!(pool.cell_at(last).unwrap().coord, Coord::new(2, 2, 3));
        assert!(pool.cell_at(last + 1).is_none());
        assert!(pool.cell_at(usize::MAX).is_none());
    }

    #[test]
    fn test_summary_counts_media() {
        let pool = Pool::new(&stepped_field(), 4).unwrap();
        let summary = pool.summary();
        assert_eq!(summary.terrain_cells, 1 + 2 + 1 + 2);
        assert_eq!(summary.water_cells, 36 - 6);
        assert!(summary.source.is_none());
        assert!(summary.max_water_intensity.is_none());
    }
}
