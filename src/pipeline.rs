use log::{debug, info};
use polars::prelude::DataFrame;
use smartcore::metrics::accuracy;

use crate::bundle::ModelBundle;
use crate::cleaning;
use crate::config::TrainConfig;
use crate::error::Result;
use crate::matrix;
use crate::naive_bayes::GaussianNB;
use crate::records::FEATURES;
use crate::scaler::StandardScaler;
use crate::selection::SelectKBest;
use crate::split;

pub struct Preprocessed {
    pub cleaned: DataFrame,
    pub scaled: DataFrame,
    pub scaler: StandardScaler,
}

/// Deduplicate (and optionally impute) then standardize the features.
/// The scaled frame keeps the label column unchanged.
pub fn preprocess(raw: DataFrame, impute: bool) -> Result<Preprocessed> {
    info!("raw dataset: {:?} (rows, columns)", raw.shape());
    let cleaned = cleaning::clean(raw, impute)?;
    info!("after removing duplicates: {:?}", cleaned.shape());

    let x = matrix::features_to_matrix(&cleaned)?;
    let y = matrix::target_to_labels(&cleaned)?;
    let scaler = StandardScaler::fit(&x)?;
    let scaled = matrix::to_frame(&scaler.transform(&x)?, &y)?;
    info!("scaled dataset: {:?}", scaled.shape());

    Ok(Preprocessed {
        cleaned,
        scaled,
        scaler,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub rows: usize,
    pub selected_features: Vec<String>,
    pub test_indices: Vec<usize>,
    pub n_train: usize,
    pub n_test: usize,
    /// Fraction of test rows predicted correctly.
    pub accuracy: f64,
}

pub struct TrainOutcome {
    pub bundle: ModelBundle,
    pub report: TrainReport,
}

/// Clean, scale, select, split, fit and evaluate. Nothing is written to disk.
pub fn train(raw: DataFrame, config: &TrainConfig) -> Result<TrainOutcome> {
    let cleaned = cleaning::clean(raw, config.impute)?;
    let x = matrix::features_to_matrix(&cleaned)?;
    let y = matrix::target_to_labels(&cleaned)?;
    debug!("training on {} cleaned rows", y.len());

    let scaler = StandardScaler::fit(&x)?;
    let x_scaled = scaler.transform(&x)?;

    let selector = SelectKBest::fit(&x_scaled, &y, config.k)?;
    let selected_features: Vec<String> = selector
        .selected_names(&FEATURES)
        .into_iter()
        .map(String::from)
        .collect();
    info!("features selected by ANOVA F-value: {:?}", selected_features);
    let x_selected = selector.transform(&x_scaled)?;

    let split = split::train_test_split(&x_selected, &y, config.test_size, config.seed)?;
    info!(
        "training rows: {}, test rows: {}",
        split.y_train.len(),
        split.y_test.len()
    );

    let classifier = GaussianNB::new()
        .with_var_smoothing(config.var_smoothing)
        .fit(&split.x_train, &split.y_train)?;
    let y_pred = classifier.predict(&split.x_test)?;
    let score = accuracy(&split.y_test, &y_pred);
    info!("naive bayes accuracy with ANOVA selection: {:.2}%", score * 100.0);

    let report = TrainReport {
        rows: y.len(),
        selected_features,
        n_train: split.y_train.len(),
        n_test: split.y_test.len(),
        test_indices: split.indices.test,
        accuracy: score,
    };

    Ok(TrainOutcome {
        bundle: ModelBundle::new(scaler, selector, classifier),
        report,
    })
}
