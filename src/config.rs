use crate::naive_bayes::DEFAULT_VAR_SMOOTHING;

/// Parameters of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of features kept by the ANOVA selector.
    pub k: usize,
    pub test_size: f64,
    pub seed: u64,
    /// Fill missing values with the column median after deduplication.
    pub impute: bool,
    pub var_smoothing: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            k: 10,
            test_size: 0.2,
            seed: 123,
            impute: true,
            var_smoothing: DEFAULT_VAR_SMOOTHING,
        }
    }
}
