//! Min-max scaling fitted once on the training matrix
//!
//! ```text
//! x_scaled = (x - min) / (max - min)
//! ```
//!
//! Inputs outside the fitted `[min, max]` range are extrapolated, not
//! clamped. A column whose training values are all equal always scales to
//! `0.0`.

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};

/// Fitted bounds of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn scale(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (x - self.min) / (self.max - self.min)
        }
    }
}

/// Per-column ranges, positionally aligned with the column schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub ranges: Vec<ColumnRange>,
}

impl ScalerParams {
    /// Learn per-column min and max from a non-empty matrix.
    pub fn fit(matrix: &Array2<f64>) -> PipelineResult<Self> {
        if matrix.nrows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let ranges = matrix
            .axis_iter(Axis(1))
            .map(|col| {
                let (min, max) = col
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    });
                ColumnRange { min, max }
            })
            .collect();

        Ok(Self { ranges })
    }

    pub fn n_features(&self) -> usize {
        self.ranges.len()
    }

    /// Scale every row of `matrix`.
    pub fn transform(&self, matrix: &Array2<f64>) -> PipelineResult<Array2<f64>> {
        self.check_width(matrix.ncols())?;
        let mut scaled = matrix.clone();
        for (mut col, range) in scaled.axis_iter_mut(Axis(1)).zip(&self.ranges) {
            col.mapv_inplace(|x| range.scale(x));
        }
        Ok(scaled)
    }

    /// Scale a single row.
    pub fn transform_row(&self, row: ArrayView1<f64>) -> PipelineResult<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(&self.ranges)
            .map(|(&x, range)| range.scale(x))
            .collect())
    }

    fn check_width(&self, actual: usize) -> PipelineResult<()> {
        if actual != self.ranges.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.ranges.len(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_degenerate_column_scales_to_zero() {
        let params = ScalerParams::fit(&array![[5.0, 1.0], [5.0, 3.0]]).unwrap();
        assert!(params.ranges[0].is_degenerate());
        assert_eq!(params.ranges[0].scale(5.0), 0.0);
        assert_eq!(params.ranges[0].scale(42.0), 0.0);
    }

    #[test]
    fn test_out_of_range_is_extrapolated() {
        let params = ScalerParams::fit(&array![[35.0], [50.0]]).unwrap();
        let scaled = params.transform_row(array![30.0].view()).unwrap();
        assert!((scaled[0] - (-5.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            ScalerParams::fit(&empty),
            Err(PipelineError::EmptyDataset)
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let params = ScalerParams::fit(&array![[1.0, 2.0]]).unwrap();
        let err = params.transform_row(array![1.0].view()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ShapeMismatch { expected: 2, actual: 1 }
        ));
    }
}
