//! Counter aggregation
//!
//! `Counters` accumulates named deltas locally and merges them into the
//! shard's shared [`CountersMap`] on flush, so the shared map sees one
//! increment per counter per flush instead of one per event.

use std::collections::BTreeMap;
use std::sync::Arc;

use strata_batch_core::{CountersMap, Flushable, Result};
use tracing::debug;

/// Locally aggregated counter deltas
pub struct Counters {
    map: Option<Arc<dyn CountersMap>>,
    pending: BTreeMap<String, i64>,
}

impl Counters {
    /// Create an aggregator merging into `map`
    ///
    /// With `None`, `flush` is a no-op (isolated or test execution).
    pub fn new(map: Option<Arc<dyn CountersMap>>) -> Self {
        Self {
            map,
            pending: BTreeMap::new(),
        }
    }

    /// Create an aggregator merging into `map`
    pub fn attached(map: Arc<dyn CountersMap>) -> Self {
        Self::new(Some(map))
    }

    /// Create an aggregator with no backing map
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// True when a backing map is attached
    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    /// Add `delta` to the named counter, creating it at zero if absent
    ///
    /// Saturates at the `i64` bounds.
    pub fn increment(&mut self, name: &str, delta: i64) {
        match self.pending.get_mut(name) {
            Some(value) => *value = value.saturating_add(delta),
            None => {
                self.pending.insert(name.to_string(), delta);
            }
        }
    }

    /// Pending delta for a counter (zero when absent)
    pub fn get(&self, name: &str) -> i64 {
        self.pending.get(name).copied().unwrap_or(0)
    }

    /// All pending deltas in name order
    pub fn pending(&self) -> &BTreeMap<String, i64> {
        &self.pending
    }

    /// Merge pending deltas into the backing map and clear them
    ///
    /// Without a backing map this does nothing and keeps the pending deltas.
    pub fn flush(&mut self) -> Result<()> {
        let Some(map) = &self.map else {
            return Ok(());
        };
        if self.pending.is_empty() {
            return Ok(());
        }
        let count = self.pending.len();
        for (name, delta) in &self.pending {
            map.increment(name, *delta);
        }
        self.pending.clear();
        debug!(target: "strata::batch", count, "Flushed counters");
        Ok(())
    }
}

impl Flushable for Counters {
    fn flush(&mut self) -> Result<()> {
        Counters::flush(self)
    }
}

impl std::fmt::Debug for Counters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counters")
            .field("attached", &self.is_attached())
            .field("pending", &self.pending)
            .finish()
    }
}
