//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a dispatcher instance
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Total batches fully dispatched
    batch_count: AtomicU64,
    /// Total records placed across all queues (global dispatch position)
    record_count: AtomicU64,
    /// Total dispatch calls that returned before placing the whole batch
    interrupted_count: AtomicU64,
    /// Records placed per queue
    per_queue: Vec<AtomicU64>,
}

impl DispatchMetrics {
    /// Create metrics for a dispatcher over `queue_count` queues
    pub fn new(queue_count: usize) -> Self {
        Self {
            batch_count: AtomicU64::new(0),
            record_count: AtomicU64::new(0),
            interrupted_count: AtomicU64::new(0),
            per_queue: (0..queue_count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Get total batch count
    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    /// Increment batch count
    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total record count
    pub fn record_count(&self) -> u64 {
        self.record_count.load(Ordering::Relaxed)
    }

    /// Get interrupted count
    pub fn interrupted_count(&self) -> u64 {
        self.interrupted_count.load(Ordering::Relaxed)
    }

    /// Increment interrupted count
    pub fn inc_interrupted_count(&self) {
        self.interrupted_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one placement into `queue`
    pub fn inc_enqueued(&self, queue: usize) {
        self.record_count.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = self.per_queue.get(queue) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get records placed into `queue`
    pub fn enqueued_count(&self, queue: usize) -> u64 {
        self.per_queue
            .get(queue)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batch_count: self.batch_count(),
            record_count: self.record_count(),
            interrupted_count: self.interrupted_count(),
            per_queue: self
                .per_queue
                .iter()
                .map(|c| c.load(Ordering::Relaxed))
                .collect(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub batch_count: u64,
    pub record_count: u64,
    pub interrupted_count: u64,
    pub per_queue: Vec<u64>,
}
