use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartRiskError, Result};
use crate::matrix;

/// Standard scaling: `(x - mean) / std` with statistics fixed at fit time.
///
/// Population standard deviation is used. Constant columns are stored with
/// `std = 1` so they transform to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &DenseMatrix<f64>) -> Result<Self> {
        let (nrows, ncols) = x.shape();
        if nrows == 0 {
            return Err(HeartRiskError::InvalidParameter {
                name: "scaler input",
                reason: "cannot fit on an empty dataset".to_string(),
            });
        }

        let mut mean = Vec::with_capacity(ncols);
        let mut std = Vec::with_capacity(ncols);
        for c in 0..ncols {
            let col = matrix::column(x, c);
            let m = col.iter().sum::<f64>() / nrows as f64;
            let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / nrows as f64;
            let s = var.sqrt();
            mean.push(m);
            std.push(if s.abs() < f64::EPSILON { 1.0 } else { s });
        }

        Ok(StandardScaler { mean, std })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn transform(&self, x: &DenseMatrix<f64>) -> Result<DenseMatrix<f64>> {
        let (_, ncols) = x.shape();
        self.check_width(ncols)?;
        let scaled = matrix::rows(x)
            .iter()
            .map(|row| self.transform_row(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(matrix::from_rows(&scaled, ncols))
    }

    pub fn inverse_transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(z, (m, s))| m + z * s)
            .collect())
    }

    fn check_width(&self, actual: usize) -> Result<()> {
        if actual != self.n_features() {
            return Err(HeartRiskError::ShapeMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual,
            });
        }
        Ok(())
    }
}
