//! Choosing positions for the sound source and for navigators.
//!
//! Axes the caller leaves out, or gives outside the pool, are drawn from the
//! injected random generator so tests stay deterministic.

use super::{Pool, SoundSource};
use crate::error::{Result, SimError};
use crate::propagation::{PropagationMode, PropagationReport};
use rand::Rng;
use sonarpool_data::{Coord, Medium, Placement};

/// Random columns tried before giving up on finding water.
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

impl Pool {
    /// Lowest water cell of the `(x, y)` column.
    ///
    /// The scan starts one layer above the floor, matching the convention
    /// that nothing rests directly on the pool bottom, and climbs while the
    /// cell is not water. `None` when the column has no water at all.
    #[must_use]
    pub fn lowest_water(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.length() || y >= self.width() {
            return None;
        }
        let start = 1.min(self.height() - 1);
        (start..self.height()).find(|&z| self.is_water(Coord::new(x, y, z)))
    }

    fn pick_axis<R: Rng + ?Sized>(
        requested: Option<usize>,
        extent: usize,
        axis: &str,
        rng: &mut R,
    ) -> usize {
        match requested {
            Some(v) if v < extent => v,
            Some(v) => {
                tracing::warn!(axis, requested = v, extent, "Coordinate outside pool, choosing randomly");
                rng.gen_range(0..extent)
            }
            None => rng.gen_range(0..extent),
        }
    }

    /// Resolves where a new source would go without touching the pool.
    pub fn resolve_source_coord<R: Rng + ?Sized>(
        &self,
        placement: Placement,
        rng: &mut R,
    ) -> Result<Coord> {
        let x = Self::pick_axis(placement.x, self.length(), "x", rng);
        let y = Self::pick_axis(placement.y, self.width(), "y", rng);
        let z_min = self.lowest_water(x, y).ok_or_else(|| {
            SimError::configuration(format!("column ({x}, {y}) holds no water"))
        })?;

        let z = match placement.z {
            Some(z) if (z_min..self.height()).contains(&z) => z,
            Some(z) => {
                tracing::warn!(requested = z, lowest = z_min, "Source height out of range, resting it on the bottom");
                z_min
            }
            None => z_min,
        };
        Ok(Coord::new(x, y, z))
    }

    /// Resolves a navigator position: a water cell at or above the lowest
    /// water of its column. Random heights are drawn from `[lowest, height)`.
    pub fn resolve_navigator_coord<R: Rng + ?Sized>(
        &self,
        placement: Placement,
        rng: &mut R,
    ) -> Result<Coord> {
        let fixed_column = matches!(placement, Placement { x: Some(x), y: Some(y), .. } if x < self.length() && y < self.width());

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = Self::pick_axis(placement.x, self.length(), "x", rng);
            let y = Self::pick_axis(placement.y, self.width(), "y", rng);

            let Some(z_min) = self.lowest_water(x, y) else {
                if fixed_column {
                    return Err(SimError::InvalidTarget(Coord::new(x, y, self.height() - 1)));
                }
                continue;
            };

            if let Some(z) = placement.z {
                let requested = Coord::new(x, y, z);
                if z >= z_min && self.is_water(requested) {
                    return Ok(requested);
                }
                tracing::warn!(requested = z, lowest = z_min, "Navigator height unusable, choosing randomly");
            }

            let open: Vec<usize> = (z_min..self.height())
                .filter(|&z| self.is_water(Coord::new(x, y, z)))
                .collect();
            if open.is_empty() {
                if fixed_column {
                    return Err(SimError::InvalidTarget(Coord::new(x, y, z_min)));
                }
                continue;
            }
            return Ok(Coord::new(x, y, open[rng.gen_range(0..open.len())]));
        }

        Err(SimError::configuration(
            "no water cell found for the navigator",
        ))
    }

    /// Places the sound source and propagates its intensity through the pool.
    ///
    /// A pool holds one source at a time; call [`Pool::clear_source`] before
    /// placing another.
    pub fn place_source<R: Rng + ?Sized>(
        &mut self,
        placement: Placement,
        intensity: f64,
        mode: PropagationMode,
        rng: &mut R,
    ) -> Result<PropagationReport> {
        if let Some(existing) = self.source() {
            return Err(SimError::SourceAlreadyPlaced(existing.coord));
        }
        if !intensity.is_finite() || intensity <= 0.0 {
            return Err(SimError::invalid_argument(format!(
                "source intensity must be finite and positive, got {intensity}"
            )));
        }

        let coord = self.resolve_source_coord(placement, rng)?;
        let idx = self.index(coord);
        let cell = &mut self.cells_mut()[idx];
        cell.medium = Medium::Source;
        cell.clear_intensity();
        cell.set_intensity(intensity);
        self.set_source(Some(SoundSource {
            coord,
            intensity,
            mode,
        }));
        tracing::info!(source = %coord, intensity, ?mode, "Placed sound source");

        self.propagate()
    }

    /// Removes the source and every computed intensity.
    pub fn clear_source(&mut self) {
        let Some(source) = self.source().copied() else {
            return;
        };
        let idx = self.index(source.coord);
        let cells = self.cells_mut();
        cells[idx].medium = Medium::Water;
        for cell in cells.iter_mut() {
            cell.clear_intensity();
        }
        self.set_source(None);
        tracing::info!(source = %source.coord, "Cleared sound source");
    }
}
