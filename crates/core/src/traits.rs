//! Core traits for the batching layer
//!
//! These traits are the seams between the pools and everything outside
//! them: the backend (`Datastore`), the framework's shared counters
//! (`CountersMap`), application models (`Model`), and the context's pool
//! registry (`Flushable`).

use crate::entity::Entity;
use crate::error::Result;
use crate::key::Key;

/// Backend that receives flushed batches
///
/// Both calls are synchronous from the pool's point of view: a flush does
/// not return until the call completes or fails. Implementations own any
/// retry or timeout policy; the pools never retry.
///
/// Thread safety: a single datastore is usually shared by every context in
/// the process (requires Send + Sync).
pub trait Datastore: Send + Sync {
    /// Write a batch of entities, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the batch. The caller keeps
    /// its buffer and may resend the same batch.
    fn put(&self, entities: &[Entity]) -> Result<()>;

    /// Delete a batch of keys, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the batch.
    fn delete(&self, keys: &[Key]) -> Result<()>;
}

/// Shared counters that aggregated deltas are merged into
///
/// The map may be shared across contexts and threads; `increment` must be
/// atomic with respect to other callers.
pub trait CountersMap: Send + Sync {
    /// Add `delta` to the named counter, creating it at zero if absent
    fn increment(&self, name: &str, delta: i64);
}

/// Application-level record type
///
/// The serialization hook that turns a model instance into its canonical
/// backend form.
pub trait Model {
    /// Canonical key of this instance
    ///
    /// May be incomplete for instances the backend has not assigned an
    /// id to yet.
    fn key(&self) -> Key;

    /// Canonical backend record of this instance
    ///
    /// # Errors
    ///
    /// Returns an error if the instance cannot be serialized.
    fn to_entity(&self) -> Result<Entity>;
}

/// Anything the context can flush
///
/// Registered pools are flushed by `Context::flush` in registration order.
pub trait Flushable: Send {
    /// Send everything buffered to its destination
    ///
    /// Must be safe to call repeatedly; flushing an empty pool does nothing.
    ///
    /// # Errors
    ///
    /// Returns the destination's error. Implementations keep the buffered
    /// data when the flush fails.
    fn flush(&mut self) -> Result<()>;
}

impl<T: Datastore + ?Sized> Datastore for std::sync::Arc<T> {
    fn put(&self, entities: &[Entity]) -> Result<()> {
        (**self).put(entities)
    }

    fn delete(&self, keys: &[Key]) -> Result<()> {
        (**self).delete(keys)
    }
}

impl<T: CountersMap + ?Sized> CountersMap for std::sync::Arc<T> {
    fn increment(&self, name: &str, delta: i64) {
        (**self).increment(name, delta)
    }
}
