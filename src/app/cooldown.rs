use std::time::{Duration, Instant};

/// Rate limit for one user action.
///
/// Each action owns its own cooldown; firing one never delays another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    period: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before the action may fire again.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last.map_or(Duration::ZERO, |last| {
            self.period
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    #[must_use]
    pub fn ready(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// Fires when ready, restarting the period. Returns whether it fired.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }
}
