//! Linear projection from feature space (`D_in`) to reduced space (`D_out`).

use crate::error::{ProjectionError, ProjectionResult};
use crate::matrix::ProjectionMatrix;
use projdex_core::{Boundary, DimensionMismatch};

/// A validated, immutable linear transform.
///
/// Built once from a loaded matrix and shared read-only afterwards, so
/// `project` is safe to call from any number of threads.
#[derive(Debug, Clone)]
pub struct Projection {
    matrix: ProjectionMatrix,
}

impl Projection {
    /// Validate `matrix` against the expected dimensions.
    ///
    /// # Errors
    /// - `InvalidMatrix` if the shape differs from `input_dimension × output_dimension`,
    ///   if either side is empty, if the mean length differs from `input_dimension`,
    ///   or if any weight or mean value is non-finite
    pub fn new(
        matrix: ProjectionMatrix,
        input_dimension: usize,
        output_dimension: usize,
    ) -> ProjectionResult<Self> {
        if matrix.rows() == 0 || matrix.cols() == 0 {
            return Err(ProjectionError::invalid(format!(
                "empty matrix {}x{}",
                matrix.rows(),
                matrix.cols()
            )));
        }
        if matrix.rows() != input_dimension {
            return Err(ProjectionError::invalid(format!(
                "matrix has {} rows, expected input dimension {}",
                matrix.rows(),
                input_dimension
            )));
        }
        if matrix.cols() != output_dimension {
            return Err(ProjectionError::invalid(format!(
                "matrix has {} columns, expected output dimension {}",
                matrix.cols(),
                output_dimension
            )));
        }
        if let Some(mean) = matrix.mean() {
            if mean.len() != input_dimension {
                return Err(ProjectionError::invalid(format!(
                    "mean vector has length {}, expected {}",
                    mean.len(),
                    input_dimension
                )));
            }
        }
        matrix.check_finite()?;

        Ok(Self { matrix })
    }

    /// Feature vector length (`D_in`)
    pub fn input_dimension(&self) -> usize {
        self.matrix.rows()
    }

    /// Reduced vector length (`D_out`)
    pub fn output_dimension(&self) -> usize {
        self.matrix.cols()
    }

    /// Underlying matrix
    pub fn matrix(&self) -> &ProjectionMatrix {
        &self.matrix
    }

    /// Project a feature vector into a freshly allocated reduced vector.
    pub fn project(&self, features: &[f32]) -> ProjectionResult<Vec<f32>> {
        let mut out = vec![0.0f32; self.output_dimension()];
        self.project_into(features, &mut out)?;
        Ok(out)
    }

    /// Project a feature vector into `out`.
    ///
    /// Computes `out[j] = Σ_i (features[i] - mean[i]) * matrix[i][j]`, walking
    /// the matrix one row at a time.
    pub fn project_into(&self, features: &[f32], out: &mut [f32]) -> ProjectionResult<()> {
        DimensionMismatch::check(Boundary::Input, self.input_dimension(), features.len())?;
        DimensionMismatch::check(Boundary::Output, self.output_dimension(), out.len())?;
        if let Some(index) = features.iter().position(|v| !v.is_finite()) {
            return Err(ProjectionError::NonFiniteInput { index });
        }

        out.iter_mut().for_each(|o| *o = 0.0);
        let mean = self.matrix.mean();

        let rows = self.matrix.as_slice().chunks_exact(self.output_dimension());
        for ((i, &x), row) in features.iter().enumerate().zip(rows) {
            let centred = match mean {
                Some(mean) => x - mean[i],
                None => x,
            };
            if centred == 0.0 {
                continue;
            }
            for (o, &w) in out.iter_mut().zip(row) {
                *o += centred * w;
            }
        }

        // Finite inputs and weights can still overflow once summed.
        if let Some(index) = out.iter().position(|v| !v.is_finite()) {
            return Err(ProjectionError::NonFiniteOutput { index });
        }
        Ok(())
    }
}
