// Snapshot Metrics
// Fire-and-forget counters for snapshot operations

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters maintained by the lifecycle manager
///
/// Increments never block and never fail a request.
#[derive(Debug, Default)]
pub struct SnapshotMetrics {
    external_create: AtomicU64,
    local_create: AtomicU64,
    get: AtomicU64,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsCounters {
    pub external_create: u64,
    pub local_create: u64,
    pub get: u64,
}

impl SnapshotMetrics {
    pub fn inc_external_create(&self) {
        self.external_create.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_local_create(&self) {
        self.local_create.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_get(&self) {
        self.get.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counters(&self) -> MetricsCounters {
        MetricsCounters {
            external_create: self.external_create.load(Ordering::Relaxed),
            local_create: self.local_create.load(Ordering::Relaxed),
            get: self.get.load(Ordering::Relaxed),
        }
    }
}
