//! Test doubles for the batching layer
//!
//! Provides a datastore that records every batch it receives and a pool
//! that counts flushes, both with switchable failure injection. Used by
//! this workspace's tests and by applications testing their mappers
//! without a live backend.
//!
//! # Example
//!
//! ```ignore
//! use strata_batch_storage::testing::{DatastoreCall, RecordingDatastore};
//!
//! let store = Arc::new(RecordingDatastore::new());
//! let mut pool = MutationPool::new(store.clone());
//! pool.put(entity.clone())?;
//! pool.flush()?;
//! assert_eq!(store.calls(), vec![DatastoreCall::Put(vec![entity])]);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use strata_batch_core::{Datastore, Entity, Error, Flushable, Key, Result};

/// One call received by a [`RecordingDatastore`]
#[derive(Debug, Clone, PartialEq)]
pub enum DatastoreCall {
    /// A `put` batch
    Put(Vec<Entity>),
    /// A `delete` batch
    Delete(Vec<Key>),
}

/// Datastore that records successful calls in order
///
/// Failed calls (while a failure switch is on) are not recorded.
#[derive(Debug, Default)]
pub struct RecordingDatastore {
    calls: Mutex<Vec<DatastoreCall>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
    failed_attempts: AtomicUsize,
}

impl RecordingDatastore {
    /// Create a datastore with no recorded calls
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `put` calls fail (or succeed again)
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `delete` calls fail (or succeed again)
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<DatastoreCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of calls rejected by failure injection
    pub fn failed_attempts(&self) -> usize {
        self.failed_attempts.load(Ordering::SeqCst)
    }

    /// Every entity written so far, across batches
    pub fn put_entities(&self) -> Vec<Entity> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DatastoreCall::Put(batch) => Some(batch.clone()),
                DatastoreCall::Delete(_) => None,
            })
            .flatten()
            .collect()
    }

    /// Every key deleted so far, across batches
    pub fn deleted_keys(&self) -> Vec<Key> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DatastoreCall::Delete(batch) => Some(batch.clone()),
                DatastoreCall::Put(_) => None,
            })
            .flatten()
            .collect()
    }

    /// Forget all recorded calls
    pub fn reset(&self) {
        self.calls.lock().clear();
        self.failed_attempts.store(0, Ordering::SeqCst);
    }
}

impl Datastore for RecordingDatastore {
    fn put(&self, entities: &[Entity]) -> Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            self.failed_attempts.fetch_add(1, Ordering::SeqCst);
            return Err(Error::backend(format!(
                "injected put failure ({} entities)",
                entities.len()
            )));
        }
        self.calls.lock().push(DatastoreCall::Put(entities.to_vec()));
        Ok(())
    }

    fn delete(&self, keys: &[Key]) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            self.failed_attempts.fetch_add(1, Ordering::SeqCst);
            return Err(Error::backend(format!(
                "injected delete failure ({} keys)",
                keys.len()
            )));
        }
        self.calls.lock().push(DatastoreCall::Delete(keys.to_vec()));
        Ok(())
    }
}

/// Pool that only counts flushes
///
/// Clones share the same counters, so a test can keep one handle while
/// the context owns another.
#[derive(Debug, Clone, Default)]
pub struct FlushProbe {
    flushes: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl FlushProbe {
    /// Create a probe that succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe whose flushes fail
    pub fn failing() -> Self {
        let probe = Self::default();
        probe.set_fail(true);
        probe
    }

    /// Make subsequent flushes fail (or succeed again)
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of flush calls received, including failed ones
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Flushable for FlushProbe {
    fn flush(&mut self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::backend("injected pool flush failure"));
        }
        Ok(())
    }
}
