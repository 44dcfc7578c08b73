//! Per-task execution context
//!
//! A `Context` is created once per task attempt. It owns the attempt's
//! mutation pool and counters and keeps a registry of every pool the task
//! wants flushed with them.
//!
//! ## Registry
//!
//! Pools are stored by name in registration order. The two built-ins
//! (`mutation_pool`, then `counters`) are registered by the constructor, so
//! they are always flushed first. Registering a name again replaces the
//! pool in place: last registration wins and the flush position is kept.
//!
//! ## Flush
//!
//! `Context::flush` flushes every registered pool in order and stops at the
//! first error. Pools after the failing one are not flushed in that call;
//! the failed pool keeps its buffer, so the caller re-drives the flush.
//!
//! Do not hold a pool's lock while calling `Context::flush`: pool locks are
//! not reentrant.

mod builder;
pub mod current;

pub use builder::ContextBuilder;
pub use current::ContextScope;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use strata_batch_core::{
    ContextId, CountersMap, Datastore, Flushable, PoolLimits, Result, TaskAttempt,
};
use strata_batch_storage::{Counters, MutationPool};
use tracing::{info, warn};

/// Shared handle to a registered pool
pub type PoolHandle = Arc<Mutex<dyn Flushable>>;

/// Registry name of the built-in mutation pool
pub const MUTATION_POOL: &str = "mutation_pool";

/// Registry name of the built-in counters
pub const COUNTERS: &str = "counters";

/// Pools and identity of one task attempt
pub struct Context {
    id: ContextId,
    task: Option<TaskAttempt>,
    mutation_pool: Arc<Mutex<MutationPool>>,
    counters: Arc<Mutex<Counters>>,
    pools: RwLock<Vec<(String, PoolHandle)>>,
}

impl Context {
    /// Create a context with default pool budgets
    ///
    /// `counters_map` is the shard's shared counters; pass `None` for
    /// isolated execution, where counter flushes are no-ops.
    pub fn new(
        task: Option<TaskAttempt>,
        datastore: Arc<dyn Datastore>,
        counters_map: Option<Arc<dyn CountersMap>>,
    ) -> Self {
        Self::from_parts(
            task,
            MutationPool::new(datastore),
            Counters::new(counters_map),
        )
    }

    /// Create a context with explicit pool budgets
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either budget is zero.
    pub fn with_limits(
        task: Option<TaskAttempt>,
        datastore: Arc<dyn Datastore>,
        counters_map: Option<Arc<dyn CountersMap>>,
        limits: PoolLimits,
    ) -> Result<Self> {
        Ok(Self::from_parts(
            task,
            MutationPool::with_limits(datastore, limits)?,
            Counters::new(counters_map),
        ))
    }

    /// Start building a context
    pub fn builder(datastore: Arc<dyn Datastore>) -> ContextBuilder {
        ContextBuilder::new(datastore)
    }

    fn from_parts(task: Option<TaskAttempt>, pool: MutationPool, counters: Counters) -> Self {
        let mutation_pool = Arc::new(Mutex::new(pool));
        let counters = Arc::new(Mutex::new(counters));
        let mutation_handle: PoolHandle = mutation_pool.clone();
        let counters_handle: PoolHandle = counters.clone();
        Self {
            id: ContextId::new(),
            task,
            mutation_pool,
            counters,
            pools: RwLock::new(vec![
                (MUTATION_POOL.to_string(), mutation_handle),
                (COUNTERS.to_string(), counters_handle),
            ]),
        }
    }

    /// Unique id of this context
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Task attempt this context belongs to, if any
    pub fn task(&self) -> Option<&TaskAttempt> {
        self.task.as_ref()
    }

    /// The built-in mutation pool
    pub fn mutation_pool(&self) -> Arc<Mutex<MutationPool>> {
        Arc::clone(&self.mutation_pool)
    }

    /// The built-in counters
    pub fn counters(&self) -> Arc<Mutex<Counters>> {
        Arc::clone(&self.counters)
    }

    /// Add `delta` to a counter in the built-in counters
    pub fn increment(&self, name: &str, delta: i64) {
        self.counters.lock().increment(name, delta);
    }

    /// Register a pool under `name`
    ///
    /// Reusing a name replaces the earlier pool and keeps its flush
    /// position.
    pub fn register_pool(&self, name: impl Into<String>, pool: PoolHandle) {
        let name = name.into();
        let mut pools = self.pools.write();
        match pools.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                info!(target: "strata::batch", context = %self.id, pool = %name, "Replaced pool");
                slot.1 = pool;
            }
            None => {
                info!(target: "strata::batch", context = %self.id, pool = %name, "Registered pool");
                pools.push((name, pool));
            }
        }
    }

    /// Register an owned pool and get back its typed handle
    pub fn register<P: Flushable + 'static>(
        &self,
        name: impl Into<String>,
        pool: P,
    ) -> Arc<Mutex<P>> {
        let handle = Arc::new(Mutex::new(pool));
        self.register_pool(name, handle.clone());
        handle
    }

    /// Look up a registered pool
    ///
    /// Returns `None` for unknown names; never creates a pool.
    pub fn get_pool(&self, name: &str) -> Option<PoolHandle> {
        self.pools
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, pool)| Arc::clone(pool))
    }

    /// Names of all registered pools in flush order
    pub fn pool_names(&self) -> Vec<String> {
        self.pools.read().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Flush every registered pool in registration order
    ///
    /// # Errors
    ///
    /// Returns the first pool error; later pools are not flushed.
    pub fn flush(&self) -> Result<()> {
        let pools = self.pools.read().clone();
        for (name, pool) in &pools {
            if let Err(e) = pool.lock().flush() {
                warn!(
                    target: "strata::batch",
                    context = %self.id,
                    pool = %name,
                    error = %e,
                    "Pool flush failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("task", &self.task)
            .field("pools", &self.pool_names())
            .finish()
    }
}
