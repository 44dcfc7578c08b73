//! Batched puts and deletes
//!
//! A `MutationPool` buffers writes and deletes for one task attempt and
//! sends them to the [`Datastore`] in bounded batches.
//!
//! # Budget policy
//!
//! Before an item is appended, the pool checks whether the target buffer
//! would break its budget (`len >= max_entity_count` or `size + item_size >
//! max_pool_size`). If so, that buffer is flushed first and the new item
//! starts a fresh batch. The triggering item is never part of the flush and
//! is never rejected, so a single oversize item is accepted on its own and
//! goes out with the next flush.
//!
//! # Failure policy
//!
//! Buffers are cleared only after the backend call returns `Ok`. When a
//! flush fails, the error is returned unchanged and the buffer is left as
//! it was, so calling `flush` again resends exactly the same batch.

use std::sync::Arc;

use strata_batch_core::{
    Datastore, DeleteTarget, Entity, Flushable, Key, Model, PoolLimits, PutInput, Result,
};
use tracing::{debug, warn};

use crate::item_list::ItemList;

/// Buffered puts and deletes for one task attempt
pub struct MutationPool {
    datastore: Arc<dyn Datastore>,
    limits: PoolLimits,
    puts: ItemList<Entity>,
    deletes: ItemList<Key>,
}

impl MutationPool {
    /// Create a pool with default budgets
    pub fn new(datastore: Arc<dyn Datastore>) -> Self {
        Self {
            datastore,
            limits: PoolLimits::default(),
            puts: ItemList::new(),
            deletes: ItemList::new(),
        }
    }

    /// Create a pool with explicit budgets
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either budget is zero.
    pub fn with_limits(datastore: Arc<dyn Datastore>, limits: PoolLimits) -> Result<Self> {
        limits.validate()?;
        Ok(Self {
            datastore,
            limits,
            puts: ItemList::new(),
            deletes: ItemList::new(),
        })
    }

    /// Budgets this pool enforces
    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// Pending puts
    pub fn puts(&self) -> &ItemList<Entity> {
        &self.puts
    }

    /// Pending deletes
    pub fn deletes(&self) -> &ItemList<Key> {
        &self.deletes
    }

    /// True when neither buffer holds anything
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty()
    }

    /// Buffer a write
    ///
    /// Accepts a raw [`Entity`] (buffered as-is) or a [`PutInput::Model`]
    /// (converted through its serialization hook).
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the input is malformed; nothing is buffered
    ///   and no flush happens.
    /// - The backend's error if the pre-append flush fails; the new item is
    ///   not buffered and the existing batch is kept.
    pub fn put<'a>(&mut self, input: impl Into<PutInput<'a>>) -> Result<()> {
        let entity = input.into().into_entity()?;
        let entity_size = entity.encoded_size()?;
        if self
            .limits
            .would_overflow(self.puts.len(), self.puts.size(), entity_size)
        {
            self.flush_puts()?;
        }
        self.puts.append(entity, entity_size);
        Ok(())
    }

    /// Buffer a write of a model instance
    pub fn put_model(&mut self, model: &dyn Model) -> Result<()> {
        self.put(PutInput::model(model))
    }

    /// Buffer a delete
    ///
    /// Accepts a model instance, a raw entity, a key, or an encoded key
    /// string; all are normalized to the same canonical [`Key`].
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for malformed key strings and incomplete keys.
    /// - The backend's error if the pre-append flush fails.
    pub fn delete<'a>(&mut self, target: impl Into<DeleteTarget<'a>>) -> Result<()> {
        let key = target.into().into_key()?;
        let key_size = key.encoded_size()?;
        if self
            .limits
            .would_overflow(self.deletes.len(), self.deletes.size(), key_size)
        {
            self.flush_deletes()?;
        }
        self.deletes.append(key, key_size);
        Ok(())
    }

    /// Buffer a delete of a model instance
    pub fn delete_model(&mut self, model: &dyn Model) -> Result<()> {
        self.delete(DeleteTarget::model(model))
    }

    /// Send all buffered puts, then all buffered deletes
    ///
    /// At most one backend call per buffer; an empty pool makes no calls.
    ///
    /// # Errors
    ///
    /// Returns the first backend error. If the put flush fails, deletes are
    /// not attempted. Failed buffers keep their contents.
    pub fn flush(&mut self) -> Result<()> {
        self.flush_puts()?;
        self.flush_deletes()
    }

    fn flush_puts(&mut self) -> Result<()> {
        if self.puts.is_empty() {
            return Ok(());
        }
        let count = self.puts.len();
        let bytes = self.puts.size();
        if let Err(e) = self.datastore.put(self.puts.items()) {
            warn!(target: "strata::batch", count, bytes, error = %e, "Put flush failed");
            return Err(e);
        }
        debug!(target: "strata::batch", count, bytes, "Flushed puts");
        self.puts.clear();
        Ok(())
    }

    fn flush_deletes(&mut self) -> Result<()> {
        if self.deletes.is_empty() {
            return Ok(());
        }
        let count = self.deletes.len();
        let bytes = self.deletes.size();
        if let Err(e) = self.datastore.delete(self.deletes.items()) {
            warn!(target: "strata::batch", count, bytes, error = %e, "Delete flush failed");
            return Err(e);
        }
        debug!(target: "strata::batch", count, bytes, "Flushed deletes");
        self.deletes.clear();
        Ok(())
    }
}

impl Flushable for MutationPool {
    fn flush(&mut self) -> Result<()> {
        MutationPool::flush(self)
    }
}

impl std::fmt::Debug for MutationPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationPool")
            .field("limits", &self.limits)
            .field("puts", &self.puts.len())
            .field("deletes", &self.deletes.len())
            .finish()
    }
}
