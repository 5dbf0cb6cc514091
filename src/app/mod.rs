//! Replay driver for navigator runs.
//!
//! A [`Session`] reveals a navigator's trajectory one cell at a time and can
//! replace the navigator with a freshly spawned one. Both actions are rate
//! limited by their own [`Cooldown`].

pub mod cooldown;
pub mod render;

pub use cooldown::Cooldown;

use rand::Rng;
use sonarpool_core::config::PlaybackConfig;
use sonarpool_core::{Navigator, Pool, Result};
use sonarpool_data::{Coord, Placement, Steps};
use sonarpool_io::TrajectoryRecord;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

pub struct Session<R: Rng> {
    pool: Arc<Pool>,
    navigator: Navigator,
    steps: Steps,
    revealed: Vec<Coord>,
    pending: VecDeque<Coord>,
    step_cooldown: Cooldown,
    respawn_cooldown: Cooldown,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Spawns the first navigator and plans its trajectory.
    ///
    /// The spawn cell is revealed immediately.
    pub fn new(
        pool: Arc<Pool>,
        placement: Placement,
        steps: Steps,
        playback: &PlaybackConfig,
        mut rng: R,
    ) -> Result<Self> {
        let (navigator, revealed, pending) = Self::plan(&pool, placement, steps, &mut rng)?;
        Ok(Self {
            pool,
            navigator,
            steps,
            revealed,
            pending,
            step_cooldown: Cooldown::from_millis(playback.step_cooldown_ms),
            respawn_cooldown: Cooldown::from_millis(playback.respawn_cooldown_ms),
            rng,
        })
    }

    fn plan(
        pool: &Arc<Pool>,
        placement: Placement,
        steps: Steps,
        rng: &mut R,
    ) -> Result<(Navigator, Vec<Coord>, VecDeque<Coord>)> {
        let mut navigator = Navigator::spawn(Arc::clone(pool), placement, rng)?;
        let mut pending: VecDeque<Coord> = navigator.advance(steps)?.into();
        let revealed = pending.pop_front().into_iter().collect();
        Ok((navigator, revealed, pending))
    }

    /// Reveals the next trajectory cell if the step cooldown allows it.
    pub fn next_position(&mut self, now: Instant) -> Option<Coord> {
        if self.pending.is_empty() || !self.step_cooldown.try_fire(now) {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.revealed.push(next);
        tracing::trace!(id = %self.navigator.id(), position = %next, "Revealed position");
        Some(next)
    }

    /// Replaces the navigator if the respawn cooldown allows it.
    ///
    /// Returns the record of the replaced navigator's run, covering only the
    /// cells revealed so far.
    pub fn respawn(&mut self, now: Instant, placement: Placement) -> Result<Option<TrajectoryRecord>> {
        if !self.respawn_cooldown.try_fire(now) {
            return Ok(None);
        }
        let finished = self.record()?;
        let (navigator, revealed, pending) =
            Self::plan(&self.pool, placement, self.steps, &mut self.rng)?;
        tracing::info!(
            previous = %finished.navigator_id,
            id = %navigator.id(),
            position = %navigator.visited()[0],
            "Respawned navigator"
        );
        self.navigator = navigator;
        self.revealed = revealed;
        self.pending = pending;
        Ok(Some(finished))
    }

    /// `true` once the whole planned trajectory has been revealed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn revealed(&self) -> &[Coord] {
        &self.revealed
    }

    /// Last revealed cell.
    #[must_use]
    pub fn position(&self) -> Option<Coord> {
        self.revealed.last().copied()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    /// Snapshot of the current run as an exportable record.
    pub fn record(&self) -> Result<TrajectoryRecord> {
        let arrived = self.is_finished() && self.navigator.has_arrived()?;
        Ok(TrajectoryRecord::new(
            self.navigator.id(),
            self.pool.source().map(|s| s.coord),
            self.revealed.clone(),
            arrived,
        ))
    }
}
