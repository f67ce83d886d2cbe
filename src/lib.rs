//! Heart-disease risk prediction: a Gaussian Naive Bayes classifier trained
//! on ANOVA-selected, standardized clinical measurements.
//!
//! Training runs `clean → scale → select → split → fit → evaluate` and
//! returns a [`bundle::ModelBundle`]; inference applies the bundle's scaler,
//! selector and classifier to one record in that fixed order.

pub mod bundle;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod input;
pub mod io;
pub mod matrix;
pub mod naive_bayes;
pub mod pipeline;
pub mod records;
pub mod scaler;
pub mod selection;
pub mod split;

pub use bundle::{ModelBundle, Prediction};
pub use config::TrainConfig;
pub use error::{HeartRiskError, Result};
pub use records::{HeartRecord, FEATURES, TARGET};
