use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartRiskError, Result};
use crate::matrix;

/// One-way ANOVA F statistic of every column of `x` against `y`.
///
/// `F = (SSB / (g - 1)) / (SSW / (n - g))`. A column with zero within-group
/// spread scores `f64::MAX` when the group means differ and `0` otherwise,
/// which keeps every score representable in JSON.
pub fn f_classif(x: &DenseMatrix<f64>, y: &[i32]) -> Result<Vec<f64>> {
    let (nrows, ncols) = x.shape();
    if nrows != y.len() {
        return Err(HeartRiskError::ShapeMismatch {
            stage: "f_classif labels",
            expected: nrows,
            actual: y.len(),
        });
    }

    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let n_groups = classes.len();
    if n_groups < 2 {
        return Err(HeartRiskError::InsufficientClasses { found: n_groups });
    }
    if nrows <= n_groups {
        return Err(HeartRiskError::InvalidParameter {
            name: "f_classif input",
            reason: format!("{nrows} samples is too few for {n_groups} groups"),
        });
    }

    let df_between = (n_groups - 1) as f64;
    let df_within = (nrows - n_groups) as f64;

    let scores = (0..ncols)
        .map(|c| {
            let col = matrix::column(x, c);
            let grand_mean = col.iter().sum::<f64>() / nrows as f64;

            let mut ss_between = 0.0;
            let mut ss_within = 0.0;
            for class in &classes {
                let group: Vec<f64> = col
                    .iter()
                    .zip(y)
                    .filter(|(_, label)| *label == class)
                    .map(|(v, _)| *v)
                    .collect();
                let mean = group.iter().sum::<f64>() / group.len() as f64;
                ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
                ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            }

            let ms_between = ss_between / df_between;
            let ms_within = ss_within / df_within;
            if ms_within > 0.0 {
                ms_between / ms_within
            } else if ms_between > 0.0 {
                f64::MAX
            } else {
                0.0
            }
        })
        .collect();

    Ok(scores)
}

/// Keeps the `k` columns with the highest ANOVA F score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectKBest {
    pub k: usize,
    pub n_features: usize,
    pub scores: Vec<f64>,
    /// Retained column indices, ascending.
    pub indices: Vec<usize>,
}

impl SelectKBest {
    pub fn fit(x: &DenseMatrix<f64>, y: &[i32], k: usize) -> Result<Self> {
        let (_, ncols) = x.shape();
        if k == 0 || k > ncols {
            return Err(HeartRiskError::InvalidParameter {
                name: "k",
                reason: format!("must be between 1 and {ncols}, got {k}"),
            });
        }

        let scores = f_classif(x, y)?;

        let mut ranked: Vec<usize> = (0..ncols).collect();
        // stable: equal scores keep column order
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        let mut indices = ranked[..k].to_vec();
        indices.sort_unstable();

        Ok(SelectKBest {
            k,
            n_features: ncols,
            scores,
            indices,
        })
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_features {
            return Err(HeartRiskError::ShapeMismatch {
                stage: "selector",
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(self.indices.iter().map(|&i| row[i]).collect())
    }

    pub fn transform(&self, x: &DenseMatrix<f64>) -> Result<DenseMatrix<f64>> {
        let selected = matrix::rows(x)
            .iter()
            .map(|row| self.transform_row(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(matrix::from_rows(&selected, self.indices.len()))
    }

    pub fn selected_names<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        self.indices.iter().map(|&i| names[i]).collect()
    }
}
