use std::time::{Duration, Instant};

/// Execution statistics for a pipeline call or a whole aggregation.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total execution time.
    pub total_time: Duration,
    /// Number of items (texts or clauses) processed.
    pub items_processed: usize,
}

impl PipelineStats {
    /// Start timing (call at start of operation).
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }

    /// Average time spent per item, zero when nothing was processed.
    pub fn per_item(&self) -> Duration {
        match u32::try_from(self.items_processed) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_time / n,
        }
    }
}

/// Tracks timing from creation to `finish`.
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    /// Finalize stats with the number of items processed.
    pub fn finish(self, items_processed: usize) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
            items_processed,
        }
    }
}
