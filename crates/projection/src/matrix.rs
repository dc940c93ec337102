//! Dense row-major projection matrix with optional centring vector.

use crate::error::{ProjectionError, ProjectionResult};

/// A `D_in × D_out` row-major matrix of f32 values.
///
/// Row `i` holds the weights feature `i` contributes to every output
/// dimension, so a projection walks the buffer front to back.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMatrix {
    /// Flat row-major data buffer.
    data: Vec<f32>,
    /// Number of rows (`D_in`).
    rows: usize,
    /// Number of columns (`D_out`).
    cols: usize,
    /// Optional per-feature mean subtracted before projecting.
    mean: Option<Vec<f32>>,
}

impl ProjectionMatrix {
    /// Create a matrix from a flat row-major buffer.
    pub fn from_row_major(data: Vec<f32>, rows: usize, cols: usize) -> ProjectionResult<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            ProjectionError::invalid(format!("shape {}x{} overflows", rows, cols))
        })?;
        if data.len() != expected {
            return Err(ProjectionError::invalid(format!(
                "data length {} does not match shape {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            data,
            rows,
            cols,
            mean: None,
        })
    }

    /// Create a matrix from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> ProjectionResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ProjectionError::invalid(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(data, rows.len(), cols)
    }

    /// Matrix that copies the first `min(rows, cols)` features through unchanged.
    pub fn truncating(rows: usize, cols: usize) -> ProjectionResult<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            ProjectionError::invalid(format!("shape {}x{} overflows", rows, cols))
        })?;
        let mut data = vec![0.0; len];
        for i in 0..rows.min(cols) {
            data[i * cols + i] = 1.0;
        }
        Ok(Self {
            data,
            rows,
            cols,
            mean: None,
        })
    }

    /// Attach a centring vector. Its length is checked when the projection is built.
    pub fn with_mean(mut self, mean: Vec<f32>) -> Self {
        self.mean = Some(mean);
        self
    }

    /// Number of rows (`D_in`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`D_out`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get a single row as a slice, or `None` past the last row.
    pub fn row(&self, r: usize) -> Option<&[f32]> {
        if r >= self.rows {
            return None;
        }
        let start = r * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Centring vector, if any.
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Flat row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check that every weight and mean value is finite.
    pub(crate) fn check_finite(&self) -> ProjectionResult<()> {
        if let Some(pos) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(ProjectionError::invalid(format!(
                "non-finite weight at row {}, column {}",
                pos / self.cols,
                pos % self.cols
            )));
        }
        if let Some(mean) = &self.mean {
            if let Some(pos) = mean.iter().position(|v| !v.is_finite()) {
                return Err(ProjectionError::invalid(format!(
                    "non-finite mean at index {}",
                    pos
                )));
            }
        }
        Ok(())
    }
}
