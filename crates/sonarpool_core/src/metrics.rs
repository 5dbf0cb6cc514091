//! Counters and structured logging for simulation runs.
//!
//! Provides progress logging for the long propagation pass and counters
//! that tests and the CLI read back after a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Simulation counters shared by the pool and its navigators.
pub struct Metrics {
    cells_computed: AtomicU64,
    memo_hits: AtomicU64,
    path_vertices: AtomicU64,
    forced_closures: AtomicU64,
    navigator_steps: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("cells_computed", &self.cells_computed())
            .field("memo_hits", &self.memo_hits())
            .field("path_vertices", &self.path_vertices())
            .field("navigator_steps", &self.navigator_steps())
            .finish()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells_computed: AtomicU64::new(0),
            memo_hits: AtomicU64::new(0),
            path_vertices: AtomicU64::new(0),
            forced_closures: AtomicU64::new(0),
            navigator_steps: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records one finished propagation layer.
    pub fn record_layer(&self, z: usize, computed: usize, duration: Duration) {
        self.cells_computed
            .fetch_add(computed as u64, Ordering::Relaxed);
        tracing::debug!(
            layer = z,
            computed = computed,
            duration_ms = duration.as_millis() as u64,
            "Layer completed"
        );
    }

    /// A path length answered from an already stored intensity.
    pub fn record_memo_hit(&self) {
        self.memo_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_path(&self, vertices: usize, forced: bool) {
        self.path_vertices
            .fetch_add(vertices as u64, Ordering::Relaxed);
        if forced {
            self.forced_closures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_step(&self) {
        self.navigator_steps.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn cells_computed(&self) -> u64 {
        self.cells_computed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn memo_hits(&self) -> u64 {
        self.memo_hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn path_vertices(&self) -> u64 {
        self.path_vertices.load(Ordering::Relaxed)
    }

    /// Polylines that had to be closed with a direct segment.
    #[must_use]
    pub fn forced_closures(&self) -> u64 {
        self.forced_closures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn navigator_steps(&self) -> u64 {
        self.navigator_steps.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.cells_computed(), 0);
        assert_eq!(metrics.navigator_steps(), 0);
    }

    #[test]
    fn test_record_layer() {
        let metrics = Metrics::new();
        metrics.record_layer(0, 12, Duration::from_millis(4));
        metrics.record_layer(1, 8, Duration::from_millis(2));
        metrics.record_memo_hit();
        assert_eq!(metrics.cells_computed(), 20);
        assert_eq!(metrics.memo_hits(), 1);
    }

    #[test]
    fn test_record_path_counts_forced_closures() {
        let metrics = Metrics::new();
        metrics.record_path(3, false);
        metrics.record_path(5, true);
        assert_eq!(metrics.path_vertices(), 8);
        assert_eq!(metrics.forced_closures(), 1);
    }
}
