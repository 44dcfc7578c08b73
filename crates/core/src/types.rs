//! Task identity types
//!
//! - ContextId: unique identifier for one execution context
//! - TaskAttempt: which job, shard, and retry a context belongs to

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an execution context
///
/// A ContextId is a wrapper around a UUID v4. Every context gets a fresh
/// id, so two attempts of the same shard never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Create a new random ContextId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a ContextId from a string representation
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one task attempt: job → shard → attempt
///
/// Format: "job_id/shard_number/attempt"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskAttempt {
    /// Job identifier
    pub job_id: String,
    /// Shard within the job
    pub shard_number: u32,
    /// Retry counter, starting at 0
    pub attempt: u32,
}

impl TaskAttempt {
    /// Create a task attempt identity
    pub fn new(job_id: impl Into<String>, shard_number: u32, attempt: u32) -> Self {
        Self {
            job_id: job_id.into(),
            shard_number,
            attempt,
        }
    }

    /// The next retry of the same shard
    pub fn retry(&self) -> Self {
        Self {
            job_id: self.job_id.clone(),
            shard_number: self.shard_number,
            attempt: self.attempt + 1,
        }
    }
}

impl fmt::Display for TaskAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.job_id, self.shard_number, self.attempt)
    }
}
