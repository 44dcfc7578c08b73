//! Core types and traits for Strata batch
//!
//! This crate defines the foundational types used throughout the system:
//! - Key: canonical backend key with a URL-safe string form
//! - Entity / Value: canonical write record
//! - PutInput / DeleteTarget: accepted input shapes, normalized to Entity / Key
//! - PoolLimits: byte and count budgets
//! - ContextId / TaskAttempt: task identity
//! - Error: error type hierarchy
//! - Traits: Datastore, CountersMap, Model, Flushable

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod key;
pub mod limits;
pub mod mutation;
pub mod traits;
pub mod types;

pub use entity::{Entity, Value};
pub use error::{Error, Result};
pub use key::{Key, KeyId, PathElement};
pub use limits::{PoolLimits, DEFAULT_MAX_ENTITY_COUNT, DEFAULT_MAX_POOL_SIZE};
pub use mutation::{DeleteTarget, PutInput};
pub use traits::{CountersMap, Datastore, Flushable, Model};
pub use types::{ContextId, TaskAttempt};
