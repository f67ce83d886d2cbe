use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{HeartRiskError, Result};
use crate::naive_bayes::GaussianNB;
use crate::records::{HeartRecord, FEATURES};
use crate::scaler::StandardScaler;
use crate::selection::SelectKBest;

pub const FORMAT_VERSION: u32 = 1;

/// Label of the "disease present" class.
pub const POSITIVE_LABEL: i32 = 1;

/// Everything inference needs, fitted together and stored in one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub selector: SelectKBest,
    pub classifier: GaussianNB,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: i32,
    /// Probability of `POSITIVE_LABEL`.
    pub probability: f64,
}

impl ModelBundle {
    pub fn new(scaler: StandardScaler, selector: SelectKBest, classifier: GaussianNB) -> Self {
        ModelBundle {
            format_version: FORMAT_VERSION,
            feature_names: FEATURES.iter().map(|s| s.to_string()).collect(),
            scaler,
            selector,
            classifier,
        }
    }

    /// Reject bundles whose parts do not line up with each other or with
    /// this build's feature order.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(HeartRiskError::BundleMismatch(format!(
                "format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        if self.feature_names != FEATURES {
            return Err(HeartRiskError::BundleMismatch(format!(
                "feature order {:?}",
                self.feature_names
            )));
        }
        if self.scaler.n_features() != FEATURES.len() || self.scaler.std.len() != FEATURES.len() {
            return Err(HeartRiskError::BundleMismatch(format!(
                "scaler fitted on {} features",
                self.scaler.n_features()
            )));
        }
        let selector = &self.selector;
        if selector.n_features != FEATURES.len()
            || selector.indices.len() != selector.k
            || selector.indices.iter().any(|&i| i >= FEATURES.len())
        {
            return Err(HeartRiskError::BundleMismatch(format!(
                "selector keeps {:?} of {} features (k={})",
                selector.indices, selector.n_features, selector.k
            )));
        }
        if !self.classifier.is_fitted() || self.classifier.n_features() != selector.k {
            return Err(HeartRiskError::BundleMismatch(format!(
                "classifier expects {} features, selector yields {}",
                self.classifier.n_features(),
                selector.k
            )));
        }
        if !self.classifier.classes.contains(&POSITIVE_LABEL) {
            return Err(HeartRiskError::BundleMismatch(format!(
                "classifier classes {:?} lack the positive label",
                self.classifier.classes
            )));
        }
        Ok(())
    }

    pub fn selected_features(&self) -> Vec<&str> {
        self.selector.selected_names(&FEATURES)
    }

    /// Scale, select and classify one ordered feature vector.
    pub fn predict_vector(&self, values: &[f64]) -> Result<Prediction> {
        let scaled = self.scaler.transform_row(values)?;
        let selected = self.selector.transform_row(&scaled)?;
        let label = self.classifier.predict_row(&selected)?;
        let probability = self.classifier.probability_of(&selected, POSITIVE_LABEL)?;
        Ok(Prediction { label, probability })
    }

    pub fn predict(&self, record: &HeartRecord) -> Result<Prediction> {
        self.predict_vector(&record.to_vector())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let bundle: ModelBundle = serde_json::from_str(text)?;
        bundle.validate()?;
        Ok(bundle)
    }
}

pub async fn save<P: AsRef<Path>>(path: P, bundle: &ModelBundle) -> Result<()> {
    let path = path.as_ref();
    let json = bundle.to_json()?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| HeartRiskError::io(path, e))?;
    info!("model bundle written to {}", path.display());
    Ok(())
}

pub async fn load<P: AsRef<Path>>(path: P) -> Result<ModelBundle> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HeartRiskError::io(path, e))?;
    let bundle = ModelBundle::from_json(&text)?;
    debug!(
        "loaded bundle v{} with features {:?}",
        bundle.format_version,
        bundle.selected_features()
    );
    Ok(bundle)
}
