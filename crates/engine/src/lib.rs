//! Task runtime for Strata batch
//!
//! This crate ties the pools to a task attempt:
//! - Context: per-attempt pool registry with ordered, fail-fast flush
//! - current: thread-local current context and its scope guard
//! - PoolConfig: mutation pool budgets loaded from `batch.toml`
//! - TaskMapper / run_slice: setup, map, cleanup lifecycle of a task slice

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod mapper;

pub use config::{PoolConfig, CONFIG_FILE_NAME};
pub use context::{current, Context, ContextBuilder, ContextScope, PoolHandle, COUNTERS, MUTATION_POOL};
pub use mapper::{run_slice, TaskMapper};
