//! Entry store error types

use projdex_core::DimensionMismatch;
use thiserror::Error;

/// Errors raised by the entry store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reduced vector (or replacement buffer) has the wrong dimension
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
