use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Tracker API and poll loop counters
#[derive(Debug, Default)]
pub struct TrackerApiMetrics {
    pub total_requests: AtomicU64,
    pub errors: AtomicU64,
    pub cycles_succeeded: AtomicU64,
    pub cycles_failed: AtomicU64,
}

impl TrackerApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle(&self, succeeded: bool) {
        if succeeded {
            self.cycles_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cycles_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_stats(&self) -> TrackerApiStats {
        TrackerApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cycles_succeeded: self.cycles_succeeded.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Tracker metrics: requests={}, errors={}, cycles_ok={}, cycles_failed={}",
            stats.total_requests, stats.errors, stats.cycles_succeeded, stats.cycles_failed
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerApiStats {
    pub total_requests: u64,
    pub errors: u64,
    pub cycles_succeeded: u64,
    pub cycles_failed: u64,
}

/// Global metrics instance
static TRACKER_METRICS: std::sync::LazyLock<TrackerApiMetrics> =
    std::sync::LazyLock::new(TrackerApiMetrics::new);

pub fn tracker_metrics() -> &'static TrackerApiMetrics {
    &TRACKER_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = TrackerApiMetrics::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_error();
        metrics.record_cycle(true);
        metrics.record_cycle(false);

        assert_eq!(
            metrics.get_stats(),
            TrackerApiStats {
                total_requests: 2,
                errors: 1,
                cycles_succeeded: 1,
                cycles_failed: 1,
            }
        );
    }
}
