//! Wall-clock timing for pipeline stages

use std::time::{Duration, Instant};
use tracing::info;

/// Timer for measuring execution time of a named stage
#[derive(Debug)]
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and log the timer
    pub fn stop(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!("{} completed in {:.4}s", self.name, elapsed.as_secs_f64());
        elapsed
    }
}
