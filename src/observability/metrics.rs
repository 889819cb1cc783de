//! Engine counters
//!
//! - Counters only, monotonic, reset on process start
//! - Thread-safe, lock-free (relaxed atomics)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the reconstruction engine
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    reconstructions_initialized: AtomicU64,
    profiles_rejected: AtomicU64,
    items_updated: AtomicU64,
    stations_matched: AtomicU64,
    exposures_recorded: AtomicU64,
    geocode_fallbacks: AtomicU64,
    records_requests: AtomicU64,
    store_failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_reconstructions(&self) {
        self.reconstructions_initialized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_profiles_rejected(&self) {
        self.profiles_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_items_updated(&self) {
        self.items_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one matcher run and the exposures it produced
    pub fn record_match(&self, exposures: usize) {
        self.stations_matched.fetch_add(1, Ordering::Relaxed);
        self.exposures_recorded
            .fetch_add(exposures as u64, Ordering::Relaxed);
    }

    pub fn increment_geocode_fallbacks(&self) {
        self.geocode_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_requests(&self) {
        self.records_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reconstructions_initialized: self.reconstructions_initialized.load(Ordering::Relaxed),
            profiles_rejected: self.profiles_rejected.load(Ordering::Relaxed),
            items_updated: self.items_updated.load(Ordering::Relaxed),
            stations_matched: self.stations_matched.load(Ordering::Relaxed),
            exposures_recorded: self.exposures_recorded.load(Ordering::Relaxed),
            geocode_fallbacks: self.geocode_fallbacks.load(Ordering::Relaxed),
            records_requests: self.records_requests.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub reconstructions_initialized: u64,
    pub profiles_rejected: u64,
    pub items_updated: u64,
    pub stations_matched: u64,
    pub exposures_recorded: u64,
    pub geocode_fallbacks: u64,
    pub records_requests: u64,
    pub store_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.reconstructions_initialized, 0);
        assert_eq!(snapshot.exposures_recorded, 0);
    }

    #[test]
    fn test_record_match_accumulates() {
        let registry = MetricsRegistry::new();
        registry.record_match(2);
        registry.record_match(0);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.stations_matched, 2);
        assert_eq!(snapshot.exposures_recorded, 2);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_items_updated();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().items_updated, 1000);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_records_requests();
        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["records_requests"], 1);
    }
}
