use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeartRiskError>;

#[derive(Error, Debug)]
pub enum HeartRiskError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing column {column:?} in dataset")]
    MissingColumn { column: String },
    #[error("missing value in column {column:?} at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("invalid label {label} at row {row}, expected 0 or 1")]
    InvalidLabel { label: i32, row: usize },
    #[error("shape mismatch in {stage}: expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("need samples from at least 2 classes, found {found}")]
    InsufficientClasses { found: usize },
    #[error("split would leave an empty set (train={train}, test={test})")]
    EmptySplit { train: usize, test: usize },
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("model bundle mismatch: {0}")]
    BundleMismatch(String),
    #[error("model used before fit: {0}")]
    NotFitted(&'static str),
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HeartRiskError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HeartRiskError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeartRiskError::ShapeMismatch {
            stage: "scaler",
            expected: 13,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch in scaler: expected 13 features, got 12"
        );

        let err = HeartRiskError::InvalidField {
            field: "sex",
            reason: "must be 0 or 1".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for sex: must be 0 or 1");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<HeartRiskError>();
        assert_sync::<HeartRiskError>();
    }
}
