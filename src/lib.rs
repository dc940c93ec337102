//! # projdex
//!
//! Similarity search over projected feature vectors.
//!
//! projdex stores, for each indexed item, an identifier and a reduced
//! embedding produced by a fixed linear projection, and answers "which
//! stored items are closest to this query" with ranked identifiers and
//! distances. The stored entries persist to a compact binary file.
//!
//! ## Quick Start
//!
//! ```ignore
//! use projdex::prelude::*;
//!
//! // 1792-dimensional features reduced to 256 dimensions
//! let index = Index::new(ProjectionMatrix::from_row_major(weights, 1792, 256)?)?;
//!
//! index.add("photos/0001.jpg", &features)?;
//! for hit in index.search(&query, 10)? {
//!     println!("{} {}", hit.identifier, hit.distance);
//! }
//!
//! index.save_to_path("photos.pdx")?;
//! ```
//!
//! ## Layers
//!
//! - `projdex-projection` - validated matrix and the `D_in → D_out` transform
//! - `projdex-storage` - append-only entry arena with snapshot reads
//! - `projdex-search` - distance kernel and swappable search backends
//! - `projdex-durability` - binary format, codec and atomic file writes
//!
//! The projection matrix is supplied by the caller and never written to the
//! index file.

#![warn(missing_docs)]

mod builder;
mod error;
mod index;

pub mod prelude;

// Re-export main entry points
pub use builder::IndexBuilder;
pub use error::{Error, Result};
pub use index::{Index, IndexStats};

// Re-export types
pub use projdex_core::{
    BackendKind, Boundary, DimensionMismatch, IndexConfig, SearchResult, DEFAULT_INPUT_DIMENSION,
    DEFAULT_OUTPUT_DIMENSION,
};
pub use projdex_projection::ProjectionMatrix;
