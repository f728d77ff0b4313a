// Process-wide counter of service operations, total and per operation name.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct VisitCounter {
    total: AtomicU64,
    by_operation: DashMap<String, u64>,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: &str) {
        self.total.fetch_add(1, Ordering::Relaxed);
        *self.by_operation.entry(operation.to_string()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn count_for(&self, operation: &str) -> u64 {
        self.by_operation
            .get(operation)
            .map(|count| *count)
            .unwrap_or(0)
    }
}
