use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartRiskError, Result};
use crate::matrix;

/// Row indices of a train/test partition, each list ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub struct Split {
    pub indices: SplitIndices,
    pub x_train: DenseMatrix<f64>,
    pub x_test: DenseMatrix<f64>,
    pub y_train: Vec<i32>,
    pub y_test: Vec<i32>,
}

/// Label-stratified partition: each class contributes
/// `round(n_class * test_size)` of its rows to the test set.
pub fn stratified_indices(y: &[i32], test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(HeartRiskError::InvalidParameter {
            name: "test_size",
            reason: format!("must be between 0 and 1, got {test_size}"),
        });
    }

    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in classes {
        let mut members: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(idx, _)| idx)
            .collect();
        members.shuffle(&mut rng);

        let n_test = (members.len() as f64 * test_size).round() as usize;
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    if train.is_empty() || test.is_empty() {
        return Err(HeartRiskError::EmptySplit {
            train: train.len(),
            test: test.len(),
        });
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}

pub fn train_test_split(
    x: &DenseMatrix<f64>,
    y: &[i32],
    test_size: f64,
    seed: u64,
) -> Result<Split> {
    let indices = stratified_indices(y, test_size, seed)?;
    Ok(Split {
        x_train: matrix::take_rows(x, &indices.train),
        x_test: matrix::take_rows(x, &indices.test),
        y_train: indices.train.iter().map(|&i| y[i]).collect(),
        y_test: indices.test.iter().map(|&i| y[i]).collect(),
        indices,
    })
}
