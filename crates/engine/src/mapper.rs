//! Mapper lifecycle
//!
//! A task slice runs `task_setup`, then `map` once per input, then
//! `task_cleanup`. The default cleanup flushes the context, so anything a
//! mapper buffered in its pools reaches the backend before the slice is
//! reported done.

use std::sync::Arc;

use strata_batch_core::Result;
use tracing::{debug, warn};

use crate::context::{Context, ContextScope};

/// User code run by a mapper task
pub trait TaskMapper {
    /// Item handed to `map`
    type Input;

    /// Called once before the first input of a slice
    fn task_setup(&mut self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Process one input
    fn map(&mut self, input: Self::Input, ctx: &Context) -> Result<()>;

    /// Called once after the last input of a slice
    ///
    /// Overrides should still flush the context.
    fn task_cleanup(&mut self, ctx: &Context) -> Result<()> {
        ctx.flush()
    }
}

/// Run one task slice of `mapper` over `inputs`
///
/// `ctx` is installed as the current context for the duration of the slice
/// and the previous value is restored on return, including on error.
/// Returns the number of inputs mapped.
///
/// # Errors
///
/// Stops at the first error from setup, map, or cleanup. Cleanup does not
/// run after a failed setup or map; buffered mutations stay in the pools.
pub fn run_slice<M, I>(mapper: &mut M, ctx: Arc<Context>, inputs: I) -> Result<usize>
where
    M: TaskMapper,
    I: IntoIterator<Item = M::Input>,
{
    let _scope = ContextScope::enter(Arc::clone(&ctx));

    mapper.task_setup(&ctx)?;
    let mut mapped = 0usize;
    for input in inputs {
        if let Err(e) = mapper.map(input, &ctx) {
            warn!(target: "strata::batch", context = %ctx.id(), mapped, error = %e, "Map failed");
            return Err(e);
        }
        mapped += 1;
    }
    mapper.task_cleanup(&ctx)?;

    debug!(target: "strata::batch", context = %ctx.id(), mapped, "Task slice complete");
    Ok(mapped)
}
