//! Projection error types

use projdex_core::DimensionMismatch;
use thiserror::Error;

/// Errors raised while building or applying a projection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Matrix or mean vector is malformed or has the wrong shape
    #[error("invalid projection matrix: {0}")]
    InvalidMatrix(String),

    /// Feature vector (or output buffer) has the wrong length
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    /// Feature vector contains NaN or an infinity
    #[error("non-finite value at feature index {index}")]
    NonFiniteInput {
        /// Offending position
        index: usize,
    },

    /// Projected value overflowed to an infinity or became NaN
    #[error("non-finite value at output index {index}")]
    NonFiniteOutput {
        /// Offending position in the reduced vector
        index: usize,
    },
}

impl ProjectionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ProjectionError::InvalidMatrix(message.into())
    }
}

/// Result type for projection operations
pub type ProjectionResult<T> = std::result::Result<T, ProjectionError>;
