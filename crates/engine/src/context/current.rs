//! Thread-local current context
//!
//! Framework callbacks that run without a direct reference to the task's
//! context reach it through this slot. The slot is thread-local, so task
//! attempts running concurrently on different worker threads never see
//! each other's context.
//!
//! The slot holds one value, not a stack: `set` overwrites whatever is
//! there. [`ContextScope`] is the usual way to install a context for the
//! duration of a task slice; it puts the previous value back on drop, even
//! when the slice unwinds.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::Context;

thread_local! {
    /// Context of the task attempt running on this thread
    static CURRENT: RefCell<Option<Arc<Context>>> = const { RefCell::new(None) };
}

/// Install `ctx` as this thread's current context, or clear it with `None`
pub fn set(ctx: Option<Arc<Context>>) {
    match &ctx {
        Some(ctx) => debug!(target: "strata::batch", context = %ctx.id(), "Set current context"),
        None => debug!(target: "strata::batch", "Cleared current context"),
    }
    CURRENT.with(|slot| *slot.borrow_mut() = ctx);
}

/// This thread's current context, `None` when none is installed
pub fn get() -> Option<Arc<Context>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Run `f` against the current context, if one is installed
pub fn with<R>(f: impl FnOnce(&Context) -> R) -> Option<R> {
    get().map(|ctx| f(&ctx))
}

/// Guard that installs a context as current for its lifetime
///
/// Not `Send`: it must be dropped on the thread whose slot it changed.
///
/// # Example
///
/// ```ignore
/// let ctx = Arc::new(Context::new(Some(task), datastore, Some(counters)));
/// {
///     let _scope = ContextScope::enter(ctx.clone());
///     run_callbacks();        // callbacks call current::get()
/// }
/// assert!(current::get().is_none());
/// ```
pub struct ContextScope {
    previous: Option<Arc<Context>>,
    _not_send: PhantomData<*const ()>,
}

impl ContextScope {
    /// Install `ctx` as current, remembering what was there before
    pub fn enter(ctx: Arc<Context>) -> Self {
        let previous = get();
        set(Some(ctx));
        Self {
            previous,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        set(self.previous.take());
    }
}
