//! Shared counters map for a shard
//!
//! `ShardCounters` is the concrete [`CountersMap`] the framework hands to
//! every context of a shard. Each `increment` is an atomic read-modify-write
//! on one DashMap entry, so concurrent task attempts can merge into it
//! without extra locking.

use std::collections::BTreeMap;

use dashmap::DashMap;
use strata_batch_core::CountersMap;

/// Thread-safe named counters
#[derive(Debug, Default)]
pub struct ShardCounters {
    counters: DashMap<String, i64>,
}

impl ShardCounters {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter (zero when absent)
    pub fn get(&self, name: &str) -> i64 {
        self.counters.get(name).map(|v| *v).unwrap_or(0)
    }

    /// Number of counters ever incremented
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True when no counter exists
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Point-in-time copy of all counters, in name order
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl CountersMap for ShardCounters {
    fn increment(&self, name: &str, delta: i64) {
        let mut value = self.counters.entry(name.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
    }
}
