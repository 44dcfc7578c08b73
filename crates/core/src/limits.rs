//! Batch budgets
//!
//! A mutation pool flushes a buffer before it would grow past either
//! budget. Defaults are sized so a single flush stays within one backend
//! RPC.

use crate::error::{Error, Result};

/// Default maximum buffered bytes per buffer (1 MiB)
pub const DEFAULT_MAX_POOL_SIZE: usize = 1024 * 1024;

/// Default maximum buffered items per buffer
pub const DEFAULT_MAX_ENTITY_COUNT: usize = 200;

/// Size and count budgets for one pool
///
/// Both the put buffer and the delete buffer of a pool are bound by the
/// same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    /// Maximum estimated bytes per buffer
    pub max_pool_size: usize,

    /// Maximum items per buffer
    pub max_entity_count: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        PoolLimits {
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            max_entity_count: DEFAULT_MAX_ENTITY_COUNT,
        }
    }
}

impl PoolLimits {
    /// Create limits with explicit budgets
    pub fn new(max_pool_size: usize, max_entity_count: usize) -> Self {
        PoolLimits {
            max_pool_size,
            max_entity_count,
        }
    }

    /// Override only the byte budget
    pub fn with_max_pool_size(max_pool_size: usize) -> Self {
        PoolLimits {
            max_pool_size,
            ..Default::default()
        }
    }

    /// Check both budgets are usable
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either budget is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_pool_size == 0 {
            return Err(Error::configuration("max_pool_size must be positive"));
        }
        if self.max_entity_count == 0 {
            return Err(Error::configuration("max_entity_count must be positive"));
        }
        Ok(())
    }

    /// True when adding an item of `item_size` to a buffer holding `count`
    /// items and `size` bytes would break a budget
    pub fn would_overflow(&self, count: usize, size: usize, item_size: usize) -> bool {
        count >= self.max_entity_count || size.saturating_add(item_size) > self.max_pool_size
    }
}
