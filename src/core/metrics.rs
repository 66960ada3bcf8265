//! Logger metrics for observability
//!
//! Counters for monitoring the dispatch pipeline: how many entries reached the
//! transports and how many transport calls failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// Shared by a logger and every child derived from it, since they share the
/// same transports.
///
/// # Example
///
/// ```
/// use transport_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_faults(2);
///
/// assert_eq!(metrics.total_dispatched(), 1);
/// assert_eq!(metrics.transport_faults(), 2);
/// assert_eq!(metrics.faulted_entries(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Entries that passed the level filter and were handed to transports
    total_dispatched: AtomicU64,

    /// Entries for which at least one transport failed
    faulted_entries: AtomicU64,

    /// Individual failed transport calls
    transport_faults: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_dispatched: AtomicU64::new(0),
            faulted_entries: AtomicU64::new(0),
            transport_faults: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_dispatched(&self) -> u64 {
        self.total_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn faulted_entries(&self) -> u64 {
        self.faulted_entries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn transport_faults(&self) -> u64 {
        self.transport_faults.load(Ordering::Relaxed)
    }

    /// Record an entry handed to the transports
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.total_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    /// Record the faults of a single entry's fan-out
    #[inline]
    pub fn record_faults(&self, count: u64) {
        if count == 0 {
            return;
        }
        self.faulted_entries.fetch_add(1, Ordering::Relaxed);
        self.transport_faults.fetch_add(count, Ordering::Relaxed);
    }

    /// Share of dispatched entries that hit at least one fault, as a percentage
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn fault_rate(&self) -> f64 {
        let total = self.total_dispatched() as f64;
        if total == 0.0 {
            0.0
        } else {
            (self.faulted_entries() as f64 / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_dispatched.store(0, Ordering::Relaxed);
        self.faulted_entries.store(0, Ordering::Relaxed);
        self.transport_faults.store(0, Ordering::Relaxed);
    }
}
