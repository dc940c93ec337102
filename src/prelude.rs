//! Convenient imports for projdex.
//!
//! ```ignore
//! use projdex::prelude::*;
//!
//! let index = Index::builder().dimensions(4, 2).matrix(matrix).build()?;
//! index.add("a", &[1.0, 2.0, 0.0, 0.0])?;
//! ```

// Main entry point
pub use crate::builder::IndexBuilder;
pub use crate::index::{Index, IndexStats};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use projdex_core::{BackendKind, IndexConfig, SearchResult};
pub use projdex_projection::ProjectionMatrix;
