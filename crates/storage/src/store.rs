//! EntryStore: the authoritative record of what is indexed
//!
//! ## Design
//!
//! The store holds its arena behind `RwLock<Arc<EntryBuffer>>`:
//! - Readers clone the `Arc` under a read lock and release it immediately.
//!   The resulting [`EntrySnapshot`] is immutable and unaffected by later writes.
//! - Writers take the write lock and mutate through `Arc::make_mut`. If a
//!   snapshot taken earlier is still alive, that clones the buffer's chunk
//!   list and the open tail chunk. Sealed chunks stay shared, so an append
//!   never copies more than one chunk of vectors.
//!
//! A reader that started iterating before a `clear` or `replace` keeps seeing
//! the contents it started with; writers never wait for readers to finish.
//!
//! ## Thread Safety
//!
//! EntryStore is `Send + Sync` and can be shared across threads.

use crate::buffer::EntryBuffer;
use crate::error::StoreResult;
use parking_lot::RwLock;
use projdex_core::{Boundary, DimensionMismatch, Entry};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Immutable point-in-time view of the store, in insertion order.
pub type EntrySnapshot = Arc<EntryBuffer>;

/// Append-only entry store with snapshot reads
#[derive(Debug)]
pub struct EntryStore {
    dimension: usize,
    inner: RwLock<Arc<EntryBuffer>>,
}

impl EntryStore {
    /// Create an empty store for vectors of length `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(Arc::new(EntryBuffer::new(dimension))),
        }
    }

    /// Vector length every entry must have
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Append one entry, returning its position.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `vector.len() != dimension`
    pub fn append(&self, identifier: &str, vector: &[f32]) -> StoreResult<usize> {
        DimensionMismatch::check(Boundary::Output, self.dimension, vector.len())?;
        let mut guard = self.inner.write();
        Arc::make_mut(&mut *guard).push(identifier, vector)
    }

    /// Append every entry or none of them.
    ///
    /// Returns the range of positions assigned to the batch.
    ///
    /// # Errors
    /// - `DimensionMismatch` for the first entry with the wrong length; the
    ///   store is left unchanged
    pub fn append_batch(&self, entries: Vec<Entry>) -> StoreResult<Range<usize>> {
        for entry in &entries {
            DimensionMismatch::check(Boundary::Output, self.dimension, entry.vector.len())?;
        }

        let mut guard = self.inner.write();
        let buffer = Arc::make_mut(&mut *guard);
        let start = buffer.len();
        for entry in entries {
            buffer.push(entry.identifier, &entry.vector)?;
        }
        Ok(start..buffer.len())
    }

    /// Remove every entry. Always succeeds.
    pub fn clear(&self) {
        let mut guard = self.inner.write();
        match Arc::get_mut(&mut *guard) {
            Some(buffer) => buffer.clear(),
            None => *guard = Arc::new(EntryBuffer::new(self.dimension)),
        }
        debug!("Entry store cleared");
    }

    /// Swap in a fully built buffer, discarding the current contents.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the buffer was built for another dimension;
    ///   the current contents are kept
    pub fn replace(&self, buffer: EntryBuffer) -> StoreResult<()> {
        DimensionMismatch::check(Boundary::Output, self.dimension, buffer.dimension())?;
        let count = buffer.len();
        *self.inner.write() = Arc::new(buffer);
        debug!(count, "Entry store replaced");
        Ok(())
    }

    /// Current number of entries
    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Take a snapshot of the current contents
    pub fn entries(&self) -> EntrySnapshot {
        Arc::clone(&*self.inner.read())
    }
}
