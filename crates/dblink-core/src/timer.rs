//! Elapsed-time measurement

use std::time::{Duration, Instant};

/// Explicit stopwatch for timing backend operations.
///
/// A plain value owned by the caller: start one per measurement instead of
/// sharing process-wide timer state, so concurrent timings cannot clobber
/// each other.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed wall time in seconds, rounded to five decimal places.
    pub fn elapsed_secs(&self) -> f64 {
        (self.elapsed().as_secs_f64() * 100_000.0).round() / 100_000.0
    }
}
