//! Index configuration
//!
//! The configuration is fixed when an index is created. It does not carry
//! projection weights; those are supplied separately at construction.

use crate::types::{DEFAULT_INPUT_DIMENSION, DEFAULT_OUTPUT_DIMENSION};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search backend selection
///
/// Only the exact linear scan exists today. Approximate structures slot in
/// here without changing the index surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackendKind {
    /// Exact O(n) scan
    #[default]
    BruteForce,
}

impl BackendKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::BruteForce => "brute_force",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "brute_force" | "bruteforce" | "flat" | "exact" => Some(BackendKind::BruteForce),
            _ => None,
        }
    }
}

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A dimension was zero
    #[error("invalid {which} dimension: {dimension} (must be > 0)")]
    InvalidDimension {
        /// `"input"` or `"output"`
        which: &'static str,
        /// Rejected value
        dimension: usize,
    },
}

/// Index configuration - immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Feature vector length (`D_in`)
    pub input_dimension: usize,
    /// Reduced vector length (`D_out`)
    pub output_dimension: usize,
    /// Search backend
    pub backend: BackendKind,
}

impl IndexConfig {
    /// Create a config with validation
    ///
    /// Returns an error if either dimension is 0.
    pub fn new(input_dimension: usize, output_dimension: usize) -> Result<Self, ConfigError> {
        let config = IndexConfig {
            input_dimension,
            output_dimension,
            backend: BackendKind::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the backend selection
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Validate dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_dimension == 0 {
            return Err(ConfigError::InvalidDimension {
                which: "input",
                dimension: self.input_dimension,
            });
        }
        if self.output_dimension == 0 {
            return Err(ConfigError::InvalidDimension {
                which: "output",
                dimension: self.output_dimension,
            });
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    /// 1792 → 256, sized for image feature embeddings
    fn default() -> Self {
        IndexConfig {
            input_dimension: DEFAULT_INPUT_DIMENSION,
            output_dimension: DEFAULT_OUTPUT_DIMENSION,
            backend: BackendKind::BruteForce,
        }
    }
}
