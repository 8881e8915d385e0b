//! Counters for observing fan-out and remote delivery health

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability.
///
/// Tracks fan-out statistics, particularly useful for detecting sink
/// failures and remote backpressure drops.
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records offered to at least one sink
    records_offered: AtomicU64,

    /// Successful sink emissions (one per accepting sink per record)
    records_emitted: AtomicU64,

    /// Sink emissions that returned an error
    sink_failures: AtomicU64,

    /// Records evicted from the remote pending buffer (drop-oldest)
    records_dropped: AtomicU64,

    /// Batches handed to the remote transport and acknowledged
    batches_delivered: AtomicU64,

    /// Batches the remote transport failed to deliver
    batches_failed: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_offered: AtomicU64::new(0),
            records_emitted: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            batches_delivered: AtomicU64::new(0),
            batches_failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_offered(&self) -> u64 {
        self.records_offered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_delivered(&self) -> u64 {
        self.batches_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_failed(&self) -> u64 {
        self.batches_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_offered(&self) -> u64 {
        self.records_offered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.records_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_batch_delivered(&self) -> u64 {
        self.batches_delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_batch_failed(&self) -> u64 {
        self.batches_failed.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_offered(), 0);
        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(metrics.records_dropped(), 0);
        assert_eq!(metrics.batches_delivered(), 0);
        assert_eq!(metrics.batches_failed(), 0);
    }

    #[test]
    fn test_counters_advance() {
        let metrics = LoggerMetrics::new();
        metrics.record_offered();
        metrics.record_emitted();
        metrics.record_emitted();
        metrics.record_dropped();
        metrics.record_batch_failed();

        assert_eq!(metrics.records_offered(), 1);
        assert_eq!(metrics.records_emitted(), 2);
        assert_eq!(metrics.records_dropped(), 1);
        assert_eq!(metrics.batches_failed(), 1);
    }
}
