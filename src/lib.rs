//! Strata batch - mutation batching for map jobs
//!
//! Map tasks write through a per-attempt [`Context`]. The context owns a
//! [`MutationPool`] that buffers puts and deletes into bounded batches,
//! a [`Counters`] aggregator, and any pools the job registers itself.
//! Flushing the context pushes everything to the backend in registration
//! order.
//!
//! # Quick Start
//!
//! ```ignore
//! use strata_batch::{current, run_slice, Context, Entity, Key, TaskMapper};
//!
//! struct Copy;
//!
//! impl TaskMapper for Copy {
//!     type Input = Entity;
//!
//!     fn map(&mut self, entity: Entity, ctx: &Context) -> strata_batch::Result<()> {
//!         ctx.mutation_pool().lock().put(entity)?;
//!         ctx.increment("copied", 1);
//!         Ok(())
//!     }
//! }
//!
//! let ctx = Arc::new(Context::builder(datastore).counters_map(shard_counters).build()?);
//! run_slice(&mut Copy, ctx, entities)?;   // cleanup flushes the context
//! ```

#[allow(deprecated)]
pub use strata_batch_core::*;
pub use strata_batch_engine::*;
#[allow(deprecated)]
pub use strata_batch_storage::EntityList;
pub use strata_batch_storage::{testing, Counters, ItemList, MutationPool, ShardCounters};
