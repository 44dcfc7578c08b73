//! Size-tracking append buffer
//!
//! `ItemList` is the buffer underneath every mutation pool. It keeps items
//! in insertion order together with a running byte estimate supplied by the
//! caller; the list never computes sizes itself.
//!
//! # Invariant
//!
//! `size() == sum of the sizes passed to append() since the last clear()`
//! and `len() == number of appends since the last clear()`.

/// Append-only buffer with a running size estimate
#[derive(Debug, Clone)]
pub struct ItemList<T> {
    items: Vec<T>,
    size: usize,
}

/// Former name of [`ItemList`]
#[deprecated(since = "0.1.0", note = "Use ItemList instead")]
pub type EntityList<T> = ItemList<T>;

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            size: 0,
        }
    }

    /// Add an item to the end, counting `item_size` bytes toward the total
    pub fn append(&mut self, item: T, item_size: usize) {
        self.items.push(item);
        self.size = self.size.saturating_add(item_size);
    }

    /// Drop all items and reset the size to zero
    ///
    /// Keeps the allocation for reuse by the next batch.
    pub fn clear(&mut self) {
        self.items.clear();
        self.size = 0;
    }

    /// Buffered items in insertion order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Former name of [`ItemList::items`]
    #[deprecated(since = "0.1.0", note = "Use items() instead")]
    pub fn entities(&self) -> &[T] {
        self.items()
    }

    /// Estimated total size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of buffered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
