//! Search backend trait
//!
//! Defines the interface for swappable search implementations.
//! Today: BruteForceBackend (exact O(n) scan).
//!
//! The trait works on entry snapshots and positions so that an approximate
//! backend can keep its own structure in sync through `on_append` and
//! `rebuild` without the entry store or the facade changing shape.

use crate::brute_force::BruteForceBackend;
use projdex_core::{BackendKind, Neighbor};
use projdex_storage::EntrySnapshot;

/// Trait for swappable search implementations
pub trait SearchBackend: Send + Sync {
    /// Backend name, for stats and logs
    fn name(&self) -> &'static str;

    /// Find the `k` nearest entries to `query` within `entries`.
    ///
    /// `query` is already projected and has the snapshot's dimension.
    /// Results are sorted by (distance asc, position asc).
    fn search(&self, entries: &EntrySnapshot, query: &[f32], k: usize) -> Vec<Neighbor>;

    /// Called after an entry is appended, while the writer lock is held.
    fn on_append(&self, _position: usize, _vector: &[f32]) {}

    /// Called after the store was cleared or replaced wholesale.
    fn rebuild(&self, _entries: &EntrySnapshot) {}
}

/// Create a backend instance for `kind`
pub fn create_backend(kind: BackendKind) -> Box<dyn SearchBackend> {
    match kind {
        BackendKind::BruteForce => Box::new(BruteForceBackend::new()),
    }
}
