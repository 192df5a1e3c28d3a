//! Time sources.
//!
//! Every timer in the engine compares [`Duration`]s measured from the clock's
//! start. The engine advances its clock once per tick and reads `now()` from
//! it everywhere else.

use std::fmt;
use std::time::{Duration, Instant, TryFromFloatSecsError};

/// A monotonic time source.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Move the clock forward by a frame delta.
    fn advance(&mut self, dt: Duration);

    /// Elapsed time since the clock started.
    fn now(&self) -> Duration;
}

/// A clock that only moves when advanced.
///
/// Used for deterministic runs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    elapsed: Duration,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for ManualClock {
    fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn now(&self) -> Duration {
        self.elapsed
    }
}

/// Wall-clock time. `advance` is ignored; `now` reads [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn advance(&mut self, _dt: Duration) {}

    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Convert a host frame delta in milliseconds.
///
/// # Errors
///
/// Fails for negative, NaN, infinite or overflowing values.
pub fn delta_from_millis(ms: f64) -> Result<Duration, TryFromFloatSecsError> {
    Duration::try_from_secs_f64(ms / 1000.0)
}
