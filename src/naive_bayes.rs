use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartRiskError, Result};
use crate::matrix;

pub const DEFAULT_VAR_SMOOTHING: f64 = 1e-9;
const MIN_VARIANCE: f64 = 1e-9;

/// Gaussian Naive Bayes classifier.
///
/// Each feature is modelled as an independent normal distribution per class.
/// Variances get `var_smoothing` times the largest feature variance added,
/// and never drop below `MIN_VARIANCE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNB {
    pub var_smoothing: f64,
    /// Sorted class labels; row `i` of every table below belongs to `classes[i]`.
    pub classes: Vec<i32>,
    pub class_priors: Vec<f64>,
    pub means: Vec<Vec<f64>>,
    pub variances: Vec<Vec<f64>>,
}

impl Default for GaussianNB {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNB {
    pub fn new() -> Self {
        GaussianNB {
            var_smoothing: DEFAULT_VAR_SMOOTHING,
            classes: Vec::new(),
            class_priors: Vec::new(),
            means: Vec::new(),
            variances: Vec::new(),
        }
    }

    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.means.first().map_or(0, Vec::len)
    }

    pub fn fit(mut self, x: &DenseMatrix<f64>, y: &[i32]) -> Result<Self> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(HeartRiskError::InvalidParameter {
                name: "training data",
                reason: "cannot fit with empty data".to_string(),
            });
        }
        if y.len() != n_samples {
            return Err(HeartRiskError::ShapeMismatch {
                stage: "naive bayes labels",
                expected: n_samples,
                actual: y.len(),
            });
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(HeartRiskError::InsufficientClasses {
                found: classes.len(),
            });
        }

        let rows = matrix::rows(x);

        let max_variance = (0..n_features)
            .map(|c| {
                let col = matrix::column(x, c);
                let mean = col.iter().sum::<f64>() / n_samples as f64;
                col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_samples as f64
            })
            .fold(0.0, f64::max);
        let epsilon = self.var_smoothing * max_variance;

        let mut class_priors = Vec::with_capacity(classes.len());
        let mut means = Vec::with_capacity(classes.len());
        let mut variances = Vec::with_capacity(classes.len());

        for class in &classes {
            let members: Vec<&Vec<f64>> = rows
                .iter()
                .zip(y)
                .filter(|(_, label)| *label == class)
                .map(|(row, _)| row)
                .collect();
            let n_class = members.len() as f64;
            class_priors.push(n_class / n_samples as f64);

            let mean: Vec<f64> = (0..n_features)
                .map(|f| members.iter().map(|row| row[f]).sum::<f64>() / n_class)
                .collect();
            let variance: Vec<f64> = (0..n_features)
                .map(|f| {
                    let spread = members
                        .iter()
                        .map(|row| (row[f] - mean[f]).powi(2))
                        .sum::<f64>()
                        / n_class;
                    (spread + epsilon).max(MIN_VARIANCE)
                })
                .collect();

            means.push(mean);
            variances.push(variance);
        }

        self.classes = classes;
        self.class_priors = class_priors;
        self.means = means;
        self.variances = variances;
        Ok(self)
    }

    /// Joint log likelihood `log P(c) + Σ log N(x_f | μ_cf, σ²_cf)` per class.
    fn joint_log_likelihood(&self, sample: &[f64]) -> Vec<f64> {
        self.class_priors
            .iter()
            .zip(self.means.iter().zip(&self.variances))
            .map(|(prior, (mean, variance))| {
                let log_likelihood: f64 = sample
                    .iter()
                    .zip(mean.iter().zip(variance))
                    .map(|(x, (mu, var))| {
                        let diff = x - mu;
                        -0.5 * (2.0 * std::f64::consts::PI * var).ln() - diff * diff / (2.0 * var)
                    })
                    .sum();
                prior.ln() + log_likelihood
            })
            .collect()
    }

    /// Posterior probability of each class, in `classes` order.
    pub fn predict_proba_row(&self, sample: &[f64]) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(HeartRiskError::NotFitted("naive bayes"));
        }
        if sample.len() != self.n_features() {
            return Err(HeartRiskError::ShapeMismatch {
                stage: "naive bayes",
                expected: self.n_features(),
                actual: sample.len(),
            });
        }

        let log_probs = self.joint_log_likelihood(sample);
        let max_log_prob = log_probs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max_log_prob.is_finite() {
            return Err(HeartRiskError::InvalidParameter {
                name: "sample",
                reason: "likelihood underflows for every class".to_string(),
            });
        }
        let exp_probs: Vec<f64> = log_probs
            .iter()
            .map(|log_p| (log_p - max_log_prob).exp())
            .collect();
        let sum: f64 = exp_probs.iter().sum();
        Ok(exp_probs.iter().map(|p| p / sum).collect())
    }

    pub fn predict_row(&self, sample: &[f64]) -> Result<i32> {
        let probabilities = self.predict_proba_row(sample)?;
        let best = probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (idx, &p)| {
                if p > best.1 {
                    (idx, p)
                } else {
                    best
                }
            })
            .0;
        Ok(self.classes[best])
    }

    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<i32>> {
        matrix::rows(x)
            .iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    /// Probability of `label`, looked up by value rather than position.
    pub fn probability_of(&self, sample: &[f64], label: i32) -> Result<f64> {
        let probabilities = self.predict_proba_row(sample)?;
        self.classes
            .iter()
            .position(|&c| c == label)
            .map(|idx| probabilities[idx])
            .ok_or_else(|| {
                HeartRiskError::BundleMismatch(format!("classifier has no class {label}"))
            })
    }
}
