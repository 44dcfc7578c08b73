//! Context builder for fluent configuration

use std::sync::Arc;

use strata_batch_core::{CountersMap, Datastore, PoolLimits, Result, TaskAttempt};

use super::Context;
use crate::config::PoolConfig;

/// Builder for a task [`Context`]
///
/// ```ignore
/// let ctx = Context::builder(datastore)
///     .task(TaskAttempt::new("job-7", 3, 0))
///     .counters_map(shard_counters)
///     .config(&PoolConfig::from_file(&path)?)
///     .build()?;
/// ```
pub struct ContextBuilder {
    datastore: Arc<dyn Datastore>,
    task: Option<TaskAttempt>,
    counters_map: Option<Arc<dyn CountersMap>>,
    limits: PoolLimits,
}

impl ContextBuilder {
    /// Create a builder with default budgets and no counters map
    pub fn new(datastore: Arc<dyn Datastore>) -> Self {
        Self {
            datastore,
            task: None,
            counters_map: None,
            limits: PoolLimits::default(),
        }
    }

    /// Set the task attempt identity
    pub fn task(mut self, task: TaskAttempt) -> Self {
        self.task = Some(task);
        self
    }

    /// Attach the shard's shared counters
    pub fn counters_map(mut self, map: Arc<dyn CountersMap>) -> Self {
        self.counters_map = Some(map);
        self
    }

    /// Set mutation pool budgets
    pub fn limits(mut self, limits: PoolLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Take mutation pool budgets from a loaded config
    ///
    /// Budgets are checked by `build`.
    pub fn config(self, config: &PoolConfig) -> Self {
        self.limits(PoolLimits::from(config))
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either budget is zero.
    pub fn build(self) -> Result<Context> {
        Context::with_limits(self.task, self.datastore, self.counters_map, self.limits)
    }
}

impl std::fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("task", &self.task)
            .field("counters_map", &self.counters_map.is_some())
            .field("limits", &self.limits)
            .finish()
    }
}
