//! Core types for projdex
//!
//! This crate defines the types shared by every layer of the index:
//! - Entry, Neighbor and SearchResult value types
//! - Dimension validation (`Boundary`, `DimensionMismatch`)
//! - IndexConfig and backend selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod types;

pub use config::{BackendKind, ConfigError, IndexConfig};
pub use types::{
    Boundary, DimensionMismatch, Entry, Neighbor, SearchResult, DEFAULT_INPUT_DIMENSION,
    DEFAULT_OUTPUT_DIMENSION,
};
