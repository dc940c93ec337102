//! Core types for the projected vector index
//!
//! This module defines the value types that cross crate boundaries:
//! - [`Entry`]: An owned (identifier, reduced vector) pair
//! - [`Neighbor`]: A positional hit produced by a search backend
//! - [`SearchResult`]: A resolved hit returned to callers
//! - [`Boundary`] / [`DimensionMismatch`]: Dimension validation shared by every layer

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Input dimensionality of the source feature extractor.
pub const DEFAULT_INPUT_DIMENSION: usize = 1792;

/// Output dimensionality of the source projection.
pub const DEFAULT_OUTPUT_DIMENSION: usize = 256;

/// A stored (identifier, reduced vector) pair.
///
/// Identifiers are caller supplied and not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Caller-supplied identifier
    pub identifier: String,
    /// Reduced vector, always `D_out` long once stored
    pub vector: Vec<f32>,
}

impl Entry {
    /// Create a new entry
    pub fn new(identifier: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            identifier: identifier.into(),
            vector,
        }
    }
}

/// A search hit addressed by insertion position.
///
/// Backends speak in positions; the facade resolves them to identifiers
/// against the same snapshot the backend scanned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position within the scanned snapshot
    pub position: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

impl Neighbor {
    /// Create a new neighbor
    pub fn new(position: usize, distance: f32) -> Self {
        Self { position, distance }
    }
}

/// A ranked search result.
///
/// `distance` is the squared Euclidean distance between the projected query
/// and the stored reduced vector (lower = more similar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the matched entry
    pub identifier: String,
    /// Squared Euclidean distance
    pub distance: f32,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(identifier: impl Into<String>, distance: f32) -> Self {
        Self {
            identifier: identifier.into(),
            distance,
        }
    }
}

/// Which side of the projection a dimension check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    /// Raw feature vector (`D_in`)
    Input,
    /// Reduced vector (`D_out`)
    Output,
}

impl Boundary {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Boundary::Input => "input",
            Boundary::Output => "output",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A vector whose length disagrees with the configured dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{boundary} dimension mismatch: expected {expected}, got {actual}")]
pub struct DimensionMismatch {
    /// Boundary the check was made at
    pub boundary: Boundary,
    /// Configured dimension
    pub expected: usize,
    /// Length actually supplied
    pub actual: usize,
}

impl DimensionMismatch {
    /// Create a new mismatch
    pub fn new(boundary: Boundary, expected: usize, actual: usize) -> Self {
        Self {
            boundary,
            expected,
            actual,
        }
    }

    /// Check `actual` against `expected`, returning a mismatch if they differ.
    pub fn check(boundary: Boundary, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::new(boundary, expected, actual))
        }
    }
}
