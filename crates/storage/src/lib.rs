//! Buffering layer for Strata batch
//!
//! This crate implements the pools that sit between task code and the
//! backend:
//! - ItemList: ordered buffer with a running byte estimate
//! - MutationPool: bounded put/delete batches with auto-flush
//! - Counters: local counter aggregation merged on flush
//! - ShardCounters: thread-safe shared counters map
//! - testing: recording datastore and flush probes for tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counters;
pub mod item_list;
pub mod mutation_pool;
pub mod shard_counters;
pub mod testing;

pub use counters::Counters;
#[allow(deprecated)]
pub use item_list::EntityList;
pub use item_list::ItemList;
pub use mutation_pool::MutationPool;
pub use shard_counters::ShardCounters;
