//! Obstacle-aware sound propagation.
//!
//! Intensity in a water cell follows an inverse-square law over the length
//! of a polyline from the source to that cell. Polyline vertices must be
//! water cells; each next vertex is picked inside a box whose XY half-size is
//! the pool's [`ObstacleBound`](crate::pool::ObstacleBound), which lets a
//! segment cut around obstacles but never tunnel through the narrowest one.
//!
//! Two vertex pickers exist. [`PropagationMode::Enhanced`] searches the whole
//! box in 3D and bends paths sideways as well as over obstacles; it costs a
//! full box scan per vertex. [`PropagationMode::Fast`] only ranks XY columns
//! and bends paths vertically. Enhanced falls back to Fast whenever it finds
//! no acceptable vertex.

use crate::error::{Result, SimError};
use crate::pool::Pool;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sonarpool_data::Coord;
use std::ops::RangeInclusive;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropagationMode {
    /// 3D deflection around obstacles.
    #[default]
    Enhanced,
    /// Vertical deflection only.
    Fast,
}

/// Vertices and length of one traced path, source first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Coord>,
    pub length: f64,
    /// Set when no vertex could be picked and the path was closed with a
    /// direct segment to the target.
    pub forced: bool,
}

/// Outcome of a full propagation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationReport {
    pub source: Coord,
    pub mode: PropagationMode,
    pub cells_computed: usize,
    pub forced_closures: usize,
    pub elapsed_ms: u64,
}

/// Builds polylines from the pool's source. Reads cell media only, so it can
/// be shared across rayon workers.
pub struct PathTracer<'a> {
    pool: &'a Pool,
    source: Coord,
    mode: PropagationMode,
}

impl<'a> PathTracer<'a> {
    pub fn new(pool: &'a Pool, mode: PropagationMode) -> Result<Self> {
        let source = pool.source().ok_or(SimError::MissingSource)?.coord;
        Ok(Self { pool, source, mode })
    }

    /// Traces the polyline from the source to a water `target`.
    pub fn trace(&self, target: Coord) -> Result<Polyline> {
        if !self.pool.cell(target)?.is_water() {
            return Err(SimError::InvalidTarget(target));
        }

        let mut z_order: Vec<usize> = (0..self.pool.height()).collect();
        z_order.sort_by_key(|&z| z.abs_diff(target.z));

        let vertex_limit = self.pool.extent().volume();
        let mut current = self.source;
        let mut vertices = vec![current];
        let mut length = 0.0;
        let mut forced = false;

        while current != target {
            let picked = match self.mode {
                PropagationMode::Enhanced => self
                    .enhanced_step(current, target)
                    .or_else(|| self.fast_step(current, target, &z_order)),
                PropagationMode::Fast => self.fast_step(current, target, &z_order),
            };
            let next = match picked {
                Some(next) if vertices.len() <= vertex_limit => next,
                _ => {
                    tracing::warn!(from = %current, target = %target, "No vertex candidate, closing path directly");
                    forced = true;
                    target
                }
            };
            length += current.euclidean(&next);
            vertices.push(next);
            current = next;
        }

        Ok(Polyline {
            vertices,
            length,
            forced,
        })
    }

    fn window(center: usize, half: usize, extent: usize) -> RangeInclusive<usize> {
        center.saturating_sub(half)..=(center + half).min(extent - 1)
    }

    fn xy_window(&self, from: Coord) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let bound = self.pool.obstacle_bound();
        (
            Self::window(from.x, bound.x, self.pool.length()),
            Self::window(from.y, bound.y, self.pool.width()),
        )
    }

    /// Closest water cell in the box by remaining Manhattan distance that
    /// strictly shortens the remaining distance without drifting away in XY.
    /// Ties go to the first cell in z, y, x enumeration order.
    fn enhanced_step(&self, from: Coord, target: Coord) -> Option<Coord> {
        let remaining = from.manhattan(&target);
        let remaining_xy = from.xy_manhattan(&target);
        let (xs, ys) = self.xy_window(from);

        (0..self.pool.height())
            .flat_map(|z| {
                let xs = xs.clone();
                ys.clone()
                    .flat_map(move |y| xs.clone().map(move |x| Coord::new(x, y, z)))
            })
            .filter(|c| {
                c.manhattan(&target) < remaining
                    && c.xy_manhattan(&target) <= remaining_xy
                    && self.pool.is_water(*c)
            })
            .min_by_key(|c| c.manhattan(&target))
    }

    /// Nearest XY column (y, x enumeration order on ties) holding water,
    /// taking its water cell closest in height to the target. A column whose
    /// best cell is the current vertex is passed over.
    fn fast_step(&self, from: Coord, target: Coord, z_order: &[usize]) -> Option<Coord> {
        let (xs, ys) = self.xy_window(from);
        let mut columns: Vec<(usize, usize)> = ys
            .flat_map(|y| xs.clone().map(move |x| (x, y)))
            .collect();
        columns.sort_by_key(|&(x, y)| x.abs_diff(target.x) + y.abs_diff(target.y));

        columns.into_iter().find_map(|(x, y)| {
            z_order
                .iter()
                .map(|&z| Coord::new(x, y, z))
                .find(|c| self.pool.is_water(*c))
                .filter(|c| *c != from)
        })
    }
}

impl Pool {
    /// Polyline from the source to `target` under the source's mode.
    pub fn trace_path(&self, target: Coord) -> Result<Polyline> {
        let mode = self.source().ok_or(SimError::MissingSource)?.mode;
        PathTracer::new(self, mode)?.trace(target)
    }

    /// Path length from the source to a water cell.
    ///
    /// Cells with a stored intensity answer by inverting the inverse-square
    /// law, `length = sqrt(source / intensity)`, without tracing again.
    pub fn path_length(&self, target: Coord) -> Result<f64> {
        let source = *self.source().ok_or(SimError::MissingSource)?;
        let cell = self.cell(target)?;
        if !cell.is_water() {
            return Err(SimError::InvalidTarget(target));
        }
        if let Some(intensity) = cell.intensity() {
            self.metrics().record_memo_hit();
            return Ok((source.intensity / intensity).sqrt());
        }
        Ok(self.trace_path(target)?.length)
    }

    /// Assigns an intensity to every water cell still missing one.
    ///
    /// Runs layer by layer. Within a layer the paths are traced in parallel
    /// against an immutable view of the pool, then each result is written
    /// once.
    pub(crate) fn propagate(&mut self) -> Result<PropagationReport> {
        let source = *self.source().ok_or(SimError::MissingSource)?;
        let started = Instant::now();
        let slice = self.length() * self.width();
        let mut cells_computed = 0;
        let mut forced_closures = 0;

        tracing::info!(source = %source.coord, mode = ?source.mode, "Propagating sound intensity");

        for z in 0..self.height() {
            let layer_started = Instant::now();
            let traced: Vec<(usize, Polyline)> = {
                let tracer = PathTracer::new(self, source.mode)?;
                let cells = self.cells();
                (z * slice..(z + 1) * slice)
                    .into_par_iter()
                    .filter(|&idx| cells[idx].is_water() && cells[idx].intensity().is_none())
                    .map(|idx| tracer.trace(cells[idx].coord).map(|path| (idx, path)))
                    .collect::<Result<Vec<_>>>()?
            };

            for (idx, path) in &traced {
                self.metrics().record_path(path.vertices.len(), path.forced);
                forced_closures += usize::from(path.forced);
                let intensity = source.intensity / (path.length * path.length);
                self.cells_mut()[*idx].set_intensity(intensity);
            }
            cells_computed += traced.len();
            self.metrics()
                .record_layer(z, traced.len(), layer_started.elapsed());
        }

        let report = PropagationReport {
            source: source.coord,
            mode: source.mode,
            cells_computed,
            forced_closures,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            cells = report.cells_computed,
            forced = report.forced_closures,
            duration_ms = report.elapsed_ms,
            "Propagation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sonarpool_data::{HeightField, Placement};

    fn flat_pool(length: usize, width: usize, height: usize) -> Pool {
        let field = HeightField::flat(length, width, 0).unwrap();
        Pool::new(&field, height).unwrap()
    }

    fn place(pool: &mut Pool, at: Placement, mode: PropagationMode) -> PropagationReport {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        pool.place_source(at, 1000.0, mode, &mut rng).unwrap()
    }

    #[test]
    fn test_flat_pool_matches_euclidean() {
        for mode in [PropagationMode::Enhanced, PropagationMode::Fast] {
            let mut pool = flat_pool(5, 4, 3);
            place(&mut pool, Placement::at(1, 1, 1), mode);
            for c in pool.water_cells().collect::<Vec<_>>() {
                let d = c.euclidean(&Coord::new(1, 1, 1));
                let length = pool.path_length(c).unwrap();
                assert!((length - d).abs() < 1e-9, "{mode:?} {c}: {length} vs {d}");
            }
        }
    }

    #[test]
    fn test_report_counts_every_water_cell() {
        let mut pool = flat_pool(3, 3, 3);
        let report = place(&mut pool, Placement::at(1, 1, 1), PropagationMode::Enhanced);
        assert_eq!(report.cells_computed, 26);
        assert_eq!(report.forced_closures, 0);
        assert_eq!(pool.metrics().cells_computed(), 26);
    }

    #[test]
    fn test_trace_requires_source() {
        let pool = flat_pool(2, 2, 2);
        assert_eq!(
            pool.trace_path(Coord::new(0, 0, 0)).unwrap_err(),
            SimError::MissingSource
        );
    }

    #[test]
    fn test_source_cell_is_not_a_target() {
        let mut pool = flat_pool(3, 3, 3);
        place(&mut pool, Placement::at(1, 1, 1), PropagationMode::Fast);
        assert_eq!(
            pool.path_length(Coord::new(1, 1, 1)).unwrap_err(),
            SimError::InvalidTarget(Coord::new(1, 1, 1))
        );
    }

    #[test]
    fn test_fast_mode_climbs_over_wall() {
        // A full-width wall two cells tall at x = 2.
        let field = HeightField::from_rows(vec![vec![0, 0, 2, 0, 0]; 3]).unwrap();
        let mut pool = Pool::new(&field, 4).unwrap();
        place(&mut pool, Placement::at(0, 1, 1), PropagationMode::Fast);

        let path = pool.trace_path(Coord::new(4, 1, 1)).unwrap();
        assert!(!path.forced);
        assert!(path.vertices.iter().skip(1).all(|v| pool.is_water(*v)));
        assert!(path.vertices.iter().any(|v| v.x == 2 && v.z >= 2));
        assert!(path.length > 4.0);
    }

    #[test]
    fn test_vertices_are_water_and_end_at_target() {
        let field = HeightField::from_rows(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 3, 3, 3, 0, 0],
            vec![0, 3, 1, 3, 0, 0],
            vec![0, 3, 3, 3, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
        ])
        .unwrap();
        let mut pool = Pool::new(&field, 5).unwrap();
        place(&mut pool, Placement::column(0, 0), PropagationMode::Enhanced);

        for target in pool.water_cells().collect::<Vec<_>>() {
            let path = pool.trace_path(target).unwrap();
            assert_eq!(path.vertices.last(), Some(&target));
            assert!(path.vertices.iter().skip(1).all(|v| pool.is_water(*v)));
            let direct = Coord::new(0, 0, 1).euclidean(&target);
            assert!(path.length + 1e-9 >= direct);
        }
    }
}
