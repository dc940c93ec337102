//! Builder for index configuration.

use crate::error::Result;
use crate::index::Index;
use projdex_core::{BackendKind, IndexConfig};
use projdex_projection::ProjectionMatrix;

/// Builder for index configuration.
///
/// # Example
///
/// ```ignore
/// // Production: default 1792 → 256 dimensions
/// let index = Index::builder().matrix(matrix).build()?;
///
/// // Small dimensions for tests
/// let index = Index::builder()
///     .dimensions(4, 2)
///     .matrix(ProjectionMatrix::truncating(4, 2)?)
///     .build()?;
///
/// // No matrix yet: initialize later
/// let index = Index::builder().dimensions(4, 2).build()?;
/// index.initialize(matrix)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
    matrix: Option<ProjectionMatrix>,
}

impl IndexBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the feature and reduced vector lengths.
    pub fn dimensions(mut self, input_dimension: usize, output_dimension: usize) -> Self {
        self.config.input_dimension = input_dimension;
        self.config.output_dimension = output_dimension;
        self
    }

    /// Select the search backend.
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the projection matrix.
    ///
    /// Without one, [`IndexBuilder::build`] returns an uninitialized index.
    pub fn matrix(mut self, matrix: ProjectionMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Build the index.
    ///
    /// # Errors
    /// - `InvalidArgument` if a dimension is zero
    /// - `InvalidMatrix` if the matrix does not fit the dimensions
    pub fn build(self) -> Result<Index> {
        let index = Index::uninitialized(self.config)?;
        if let Some(matrix) = self.matrix {
            index.initialize(matrix)?;
        }
        Ok(index)
    }
}
