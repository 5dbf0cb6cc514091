//! Greedy gradient-ascent agent.
//!
//! A navigator only senses the intensities of its 26 neighbors and always
//! moves to the loudest one, stopping on a local maximum. On a propagated
//! pool that maximum is normally the source itself, since an adjacent
//! source is entered even when it is only as loud as the current cell.

use crate::error::{Result, SimError};
use crate::pool::Pool;
use rand::Rng;
use sonarpool_data::{Coord, Placement, Steps};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Navigator {
    id: Uuid,
    pool: Arc<Pool>,
    position: Coord,
    visited: Vec<Coord>,
}

impl Navigator {
    /// Spawns a navigator on a water cell chosen from `placement`.
    pub fn spawn<R: Rng + ?Sized>(
        pool: Arc<Pool>,
        placement: Placement,
        rng: &mut R,
    ) -> Result<Self> {
        let position = pool.resolve_navigator_coord(placement, rng)?;
        Self::at(pool, position)
    }

    /// Spawns a navigator exactly at `position`, which must be water.
    pub fn at(pool: Arc<Pool>, position: Coord) -> Result<Self> {
        if !pool.cell(position)?.is_water() {
            return Err(SimError::InvalidTarget(position));
        }
        let id = Uuid::new_v4();
        tracing::debug!(%id, position = %position, "Spawned navigator");
        Ok(Self {
            id,
            pool,
            position,
            visited: vec![position],
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Every cell occupied so far, spawn position first.
    #[must_use]
    pub fn visited(&self) -> &[Coord] {
        &self.visited
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    /// Loudest neighbor with a known intensity.
    ///
    /// Ties go to the source cell, then to the first neighbor in adjacency
    /// order.
    #[must_use]
    pub fn loudest_neighbor(&self) -> Option<(Coord, f64)> {
        let source = self.pool.source().map(|s| s.coord);
        let mut best: Option<(Coord, f64)> = None;

        for neighbor in self.pool.neighbors(self.position).ok()? {
            let Some(intensity) = neighbor.intensity() else {
                continue;
            };
            let wins = match best {
                None => true,
                Some((coord, loudest)) => {
                    intensity > loudest
                        || (intensity == loudest
                            && Some(neighbor.coord) == source
                            && Some(coord) != source)
                }
            };
            if wins {
                best = Some((neighbor.coord, intensity));
            }
        }
        best
    }

    /// Cell the next move goes to, `None` on a local maximum.
    ///
    /// A neighbor must be strictly louder, except the source cell, which is
    /// also entered when it only matches the current intensity.
    fn next_move(&self) -> Result<Option<Coord>> {
        let here = self.current_intensity()?;
        let source = self.pool.source().map(|s| s.coord);
        Ok(self.loudest_neighbor().and_then(|(next, loudest)| {
            let onto_source = Some(next) == source && loudest >= here;
            (loudest > here || onto_source).then_some(next)
        }))
    }

    /// `true` when the navigator has nowhere left to move.
    pub fn has_arrived(&self) -> Result<bool> {
        Ok(self.next_move()?.is_none())
    }

    fn current_intensity(&self) -> Result<f64> {
        self.pool
            .intensity(self.position)?
            .ok_or(SimError::MissingSource)
    }

    /// Moves toward louder water and returns the cells visited by this call,
    /// the starting cell included.
    ///
    /// Stops early on a local maximum or on the source; the trajectory then
    /// ends on that cell.
    /// Fails with [`SimError::InvalidArgument`] for a zero budget.
    pub fn advance(&mut self, steps: Steps) -> Result<Vec<Coord>> {
        let mut remaining = match steps {
            Steps::Limited(0) => {
                return Err(SimError::invalid_argument(
                    "step count must be a positive integer or unbounded",
                ))
            }
            Steps::Limited(n) => Some(n),
            Steps::UntilArrival => None,
        };
        if self.pool.source().is_none() {
            return Err(SimError::MissingSource);
        }

        let mut trajectory = vec![self.position];
        while remaining != Some(0) {
            let Some(next) = self.next_move()? else {
                break;
            };

            self.position = next;
            trajectory.push(next);
            self.visited.push(next);
            self.pool.metrics().record_step();
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
        }

        tracing::debug!(
            id = %self.id,
            moves = trajectory.len() - 1,
            position = %self.position,
            "Navigator advanced"
        );
        Ok(trajectory)
    }
}
