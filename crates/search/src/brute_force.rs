//! Brute force search backend.
//!
//! Linear scan over the snapshot's vector chunks, O(n * d) per
//! query. Exact by construction, and the baseline any approximate backend is
//! checked against.

use crate::backend::SearchBackend;
use crate::distance::squared_euclidean;
use crate::topk::TopK;
use projdex_core::Neighbor;
use projdex_storage::EntrySnapshot;
use tracing::trace;

/// Exact brute force backend. Stateless: every search scans the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceBackend;

impl BruteForceBackend {
    /// Create a new backend
    pub fn new() -> Self {
        Self
    }
}

impl SearchBackend for BruteForceBackend {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn search(&self, entries: &EntrySnapshot, query: &[f32], k: usize) -> Vec<Neighbor> {
        let dimension = entries.dimension();
        if k == 0 || entries.is_empty() || dimension == 0 {
            return Vec::new();
        }
        debug_assert_eq!(query.len(), dimension);

        let mut top = TopK::new(k.min(entries.len()));
        for (first, vectors) in entries.vector_chunks() {
            for (offset, vector) in vectors.chunks_exact(dimension).enumerate() {
                top.push(first + offset, squared_euclidean(query, vector));
            }
        }

        trace!(scanned = entries.len(), k, "Brute force scan complete");
        top.into_sorted_vec()
    }
}
