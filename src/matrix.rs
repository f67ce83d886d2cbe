use polars::prelude::*;
use smartcore::linalg::basic::arrays::{Array, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartRiskError, Result};
use crate::records::{FEATURES, TARGET};

/// Build a matrix from row vectors that all have `ncols` entries.
pub fn from_rows(rows: &[Vec<f64>], ncols: usize) -> DenseMatrix<f64> {
    let nrows = rows.len();
    let mut xmatrix: DenseMatrix<f64> =
        DenseMatrix::new(nrows, ncols, vec![0.0; nrows * ncols], true);
    for (r, row) in rows.iter().enumerate() {
        for (c, val) in row.iter().enumerate() {
            xmatrix.set((r, c), *val);
        }
    }
    xmatrix
}

pub fn row(x: &DenseMatrix<f64>, r: usize) -> Vec<f64> {
    let (_, ncols) = x.shape();
    (0..ncols).map(|c| *x.get((r, c))).collect()
}

pub fn rows(x: &DenseMatrix<f64>) -> Vec<Vec<f64>> {
    let (nrows, _) = x.shape();
    (0..nrows).map(|r| row(x, r)).collect()
}

pub fn column(x: &DenseMatrix<f64>, c: usize) -> Vec<f64> {
    let (nrows, _) = x.shape();
    (0..nrows).map(|r| *x.get((r, c))).collect()
}

/// Gather the given rows into a new matrix.
pub fn take_rows(x: &DenseMatrix<f64>, indices: &[usize]) -> DenseMatrix<f64> {
    let (_, ncols) = x.shape();
    let picked: Vec<Vec<f64>> = indices.iter().map(|&r| row(x, r)).collect();
    from_rows(&picked, ncols)
}

/// Convert the feature columns of a cleaned frame to a row-per-record matrix.
pub fn features_to_matrix(df: &DataFrame) -> Result<DenseMatrix<f64>> {
    let nrows = df.height();
    let mut values = vec![vec![0.0; FEATURES.len()]; nrows];

    for (c, name) in FEATURES.iter().enumerate() {
        let series = df
            .column(name)
            .map_err(|_| HeartRiskError::MissingColumn {
                column: name.to_string(),
            })?
            .cast(&DataType::Float64)?;
        for (r, val) in series.f64()?.into_iter().enumerate() {
            values[r][c] = val.ok_or_else(|| HeartRiskError::MissingValue {
                column: name.to_string(),
                row: r,
            })?;
        }
    }

    Ok(from_rows(&values, FEATURES.len()))
}

/// Read the binary label column; only 0 and 1 are accepted.
pub fn target_to_labels(df: &DataFrame) -> Result<Vec<i32>> {
    let series = df
        .column(TARGET)
        .map_err(|_| HeartRiskError::MissingColumn {
            column: TARGET.to_string(),
        })?
        .cast(&DataType::Int32)?;

    series
        .i32()?
        .into_iter()
        .enumerate()
        .map(|(row, label)| match label {
            Some(label @ (0 | 1)) => Ok(label),
            Some(label) => Err(HeartRiskError::InvalidLabel { label, row }),
            None => Err(HeartRiskError::MissingValue {
                column: TARGET.to_string(),
                row,
            }),
        })
        .collect()
}

/// Frame with the given matrix under the feature names, followed by `target`.
pub fn to_frame(x: &DenseMatrix<f64>, labels: &[i32]) -> Result<DataFrame> {
    let mut columns: Vec<Series> = FEATURES
        .iter()
        .enumerate()
        .map(|(c, name)| Series::new(name, column(x, c)))
        .collect();
    columns.push(Series::new(TARGET, labels.to_vec()));
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_back() {
        let data = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let x = from_rows(&data, 3);
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(rows(&x), data);
        assert_eq!(column(&x, 1), vec![2.0, 5.0]);
    }

    #[test]
    fn test_take_rows_preserves_requested_order() {
        let x = from_rows(&[vec![1.0], vec![2.0], vec![3.0]], 1);
        let picked = take_rows(&x, &[2, 0]);
        assert_eq!(rows(&picked), vec![vec![3.0], vec![1.0]]);
    }

    #[test]
    fn test_target_rejects_non_binary_label() {
        let df = df!(TARGET => &[0i32, 1, 2]).unwrap();
        let err = target_to_labels(&df).unwrap_err();
        assert!(matches!(err, HeartRiskError::InvalidLabel { label: 2, row: 2 }));
    }

    #[test]
    fn test_features_report_missing_value() {
        let mut columns: Vec<Series> = FEATURES
            .iter()
            .map(|name| Series::new(name, vec![Some(1.0f64), Some(2.0)]))
            .collect();
        columns[4] = Series::new("chol", vec![Some(200.0f64), None]);
        let df = DataFrame::new(columns).unwrap();

        let err = features_to_matrix(&df).unwrap_err();
        assert!(matches!(err, HeartRiskError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_to_frame_layout() {
        let x = from_rows(&[vec![0.5; FEATURES.len()]], FEATURES.len());
        let df = to_frame(&x, &[1]).unwrap();
        assert_eq!(df.shape(), (1, 14));
        assert_eq!(df.get_column_names()[13], TARGET);
    }
}
