//! Search layer for projdex
//!
//! This crate answers top-k queries over entry snapshots:
//! - `squared_euclidean`: the distance kernel
//! - TopK: bounded selection with insertion-order tie-break
//! - SearchBackend: trait for swappable implementations
//! - BruteForceBackend: exact O(n) scan

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod brute_force;
pub mod distance;
pub mod topk;

pub use backend::{create_backend, SearchBackend};
pub use brute_force::BruteForceBackend;
pub use distance::squared_euclidean;
pub use topk::TopK;
