//! Unified error types for projdex.
//!
//! Each layer crate raises its own error enum. This module folds them into
//! the six kinds callers match on.

use projdex_core::{ConfigError, DimensionMismatch};
use projdex_durability::CodecError;
use projdex_projection::ProjectionError;
use projdex_storage::StoreError;
use thiserror::Error;

/// All projdex errors.
///
/// No error leaves the index in a partially mutated state: a failed `add`,
/// `search` or `load` sees exactly the entries that were there before.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation called before a projection was installed
    #[error("index is not initialized")]
    NotInitialized,

    /// Projection matrix is malformed or has the wrong shape
    #[error("invalid projection matrix: {0}")]
    InvalidMatrix(String),

    /// Vector length does not match the input or output dimension
    #[error(transparent)]
    DimensionMismatch(DimensionMismatch),

    /// Argument outside its valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisted stream failed validation
    #[error("corrupt data at offset {offset}: {reason}")]
    CorruptData {
        /// Byte offset where validation failed
        offset: u64,
        /// What was wrong
        reason: String,
    },

    /// Underlying storage failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for projdex operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-initialized error.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::NotInitialized)
    }

    /// Check if this is a dimension mismatch.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Error::DimensionMismatch(_))
    }

    /// Check if a persisted stream was rejected.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Error::CorruptData { .. })
    }

    /// Check if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<DimensionMismatch> for Error {
    fn from(e: DimensionMismatch) -> Self {
        Error::DimensionMismatch(e)
    }
}

impl From<ProjectionError> for Error {
    fn from(e: ProjectionError) -> Self {
        match e {
            ProjectionError::InvalidMatrix(msg) => Error::InvalidMatrix(msg),
            ProjectionError::DimensionMismatch(d) => Error::DimensionMismatch(d),
            e @ (ProjectionError::NonFiniteInput { .. }
            | ProjectionError::NonFiniteOutput { .. }) => Error::InvalidArgument(e.to_string()),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DimensionMismatch(d) => Error::DimensionMismatch(d),
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Io(io_err) => Error::Io(io_err),
            CodecError::Store(store_err) => Error::from(store_err),
            CodecError::IdentifierTooLong { .. } | CodecError::DimensionTooLarge { .. } => {
                Error::InvalidArgument(e.to_string())
            }
            other => Error::CorruptData {
                offset: other.offset().unwrap_or(0),
                reason: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::InvalidArgument(e.to_string())
    }
}
