//! Running counters for a harvester session

use std::time::{Duration, Instant};

/// Harvest progress summary
#[derive(Debug, Clone)]
pub struct HarvestStats {
    /// Identifiers drawn so far
    pub galleries_tried: u64,

    /// Identifiers that yielded at least one page
    pub galleries_found: u64,

    /// Pages written to disk
    pub pages_saved: u64,

    /// Page writes or log appends that failed
    pub storage_failures: u64,

    started: Instant,
}

impl HarvestStats {
    pub fn new() -> Self {
        Self {
            galleries_tried: 0,
            galleries_found: 0,
            pages_saved: 0,
            storage_failures: 0,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average download rate since the session started
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.pages_saved as f64 / secs
        } else {
            0.0
        }
    }

    /// Emits a progress line at info level
    pub fn log_progress(&self) {
        tracing::info!(
            "Progress: {} galleries tried, {} found, {} pages saved, {} storage failures, {:.2} pages/sec",
            self.galleries_tried,
            self.galleries_found,
            self.pages_saved,
            self.storage_failures,
            self.pages_per_sec()
        );
    }
}

impl Default for HarvestStats {
    fn default() -> Self {
        Self::new()
    }
}
