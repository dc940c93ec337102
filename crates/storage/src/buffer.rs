//! Chunked entry arena
//!
//! Entries are grouped into chunks of [`CHUNK_ENTRIES`]. Each chunk holds a
//! `Vec<String>` of identifiers and one flat `Vec<f32>` with its vectors back
//! to back, so entry `i` of a chunk owns `vectors[i * dimension..(i + 1) * dimension]`.
//!
//! Chunks sit behind `Arc`. Once a chunk is full it is sealed and never
//! written again, so cloning a buffer shares every sealed chunk and only the
//! open tail is copied on the next push. A snapshot held across appends
//! therefore costs one tail chunk, not the whole arena.

use crate::error::StoreResult;
use projdex_core::{Boundary, DimensionMismatch, Entry};
use std::sync::Arc;

/// Entries per chunk
pub const CHUNK_ENTRIES: usize = 256;

/// Borrowed view of one stored entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryRef<'a> {
    /// Insertion position
    pub position: usize,
    /// Caller-supplied identifier
    pub identifier: &'a str,
    /// Reduced vector
    pub vector: &'a [f32],
}

impl EntryRef<'_> {
    /// Copy into an owned [`Entry`]
    pub fn to_entry(&self) -> Entry {
        Entry::new(self.identifier, self.vector.to_vec())
    }
}

#[derive(Debug, PartialEq)]
struct Chunk {
    identifiers: Vec<String>,
    vectors: Vec<f32>,
}

impl Chunk {
    fn with_capacity(dimension: usize, entries: usize) -> Self {
        Self {
            identifiers: Vec::with_capacity(entries),
            vectors: Vec::with_capacity(entries.saturating_mul(dimension)),
        }
    }

    fn len(&self) -> usize {
        self.identifiers.len()
    }

    fn heap_bytes(&self) -> usize {
        let ids: usize = self.identifiers.iter().map(String::capacity).sum();
        ids + self.identifiers.capacity() * std::mem::size_of::<String>()
            + self.vectors.capacity() * std::mem::size_of::<f32>()
    }
}

// Only the open tail is ever cloned. Keep its reserved room so the push that
// triggered the copy does not reallocate again.
impl Clone for Chunk {
    fn clone(&self) -> Self {
        let mut identifiers = Vec::with_capacity(self.identifiers.capacity());
        identifiers.extend(self.identifiers.iter().cloned());
        let mut vectors = Vec::with_capacity(self.vectors.capacity());
        vectors.extend_from_slice(&self.vectors);
        Self {
            identifiers,
            vectors,
        }
    }
}

/// Ordered, append-only collection of entries with a fixed vector dimension.
///
/// `Clone` is cheap: sealed chunks are shared, never copied.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBuffer {
    dimension: usize,
    chunks: Vec<Arc<Chunk>>,
    len: usize,
}

impl EntryBuffer {
    /// Create an empty buffer
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty buffer with room for `entries` entries
    pub fn with_capacity(dimension: usize, entries: usize) -> Self {
        let mut chunks = Vec::with_capacity(entries / CHUNK_ENTRIES + 1);
        if entries > 0 {
            chunks.push(Arc::new(Chunk::with_capacity(
                dimension,
                entries.min(CHUNK_ENTRIES),
            )));
        }
        Self {
            dimension,
            chunks,
            len: 0,
        }
    }

    /// Vector length every entry must have
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append an entry, returning its position.
    ///
    /// Only the open tail chunk is written. If that chunk is shared with a
    /// clone it is copied first; sealed chunks are never touched.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `vector.len()` differs from the buffer dimension.
    ///   Nothing is appended in that case.
    pub fn push(&mut self, identifier: impl Into<String>, vector: &[f32]) -> StoreResult<usize> {
        DimensionMismatch::check(Boundary::Output, self.dimension, vector.len())?;
        let position = self.len;
        let tail = self.open_chunk();
        tail.identifiers.push(identifier.into());
        tail.vectors.extend_from_slice(vector);
        self.len += 1;
        Ok(position)
    }

    /// Writable tail chunk, starting a new one when the last is sealed
    fn open_chunk(&mut self) -> &mut Chunk {
        let sealed = self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() >= CHUNK_ENTRIES);
        if sealed {
            let chunk = if self.chunks.is_empty() {
                Chunk::with_capacity(self.dimension, 0)
            } else {
                Chunk::with_capacity(self.dimension, CHUNK_ENTRIES)
            };
            self.chunks.push(Arc::new(chunk));
        }
        let last = self.chunks.len() - 1;
        Arc::make_mut(&mut self.chunks[last])
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }

    /// Identifier at `position`
    pub fn identifier(&self, position: usize) -> Option<&str> {
        if position >= self.len {
            return None;
        }
        self.chunks
            .get(position / CHUNK_ENTRIES)?
            .identifiers
            .get(position % CHUNK_ENTRIES)
            .map(String::as_str)
    }

    /// Reduced vector at `position`
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        if position >= self.len {
            return None;
        }
        let chunk = self.chunks.get(position / CHUNK_ENTRIES)?;
        let start = (position % CHUNK_ENTRIES) * self.dimension;
        chunk.vectors.get(start..start + self.dimension)
    }

    /// Entry at `position`
    pub fn get(&self, position: usize) -> Option<EntryRef<'_>> {
        Some(EntryRef {
            position,
            identifier: self.identifier(position)?,
            vector: self.vector(position)?,
        })
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buffer: self,
            position: 0,
        }
    }

    /// Vectors one chunk at a time, in insertion order.
    ///
    /// Each item is the position of the chunk's first entry and the chunk's
    /// vectors as one flat row-major slice.
    pub fn vector_chunks(&self) -> impl Iterator<Item = (usize, &[f32])> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i * CHUNK_ENTRIES, chunk.vectors.as_slice()))
    }

    /// Approximate heap footprint in bytes, counting shared chunks in full
    pub fn heap_bytes(&self) -> usize {
        let chunks: usize = self.chunks.iter().map(|c| c.heap_bytes()).sum();
        chunks + self.chunks.capacity() * std::mem::size_of::<Arc<Chunk>>()
    }
}

/// Insertion-order iterator over an [`EntryBuffer`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    buffer: &'a EntryBuffer,
    position: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = EntryRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.buffer.get(self.position)?;
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.buffer.len().saturating_sub(self.position);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}
