//! Preprocessing configuration

use serde::{Deserialize, Serialize};
use super::{ImputeStrategy, ScalerPolicy};

/// Whether fitted transforms are learned per dataset or once on train
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitPolicy {
    /// Train and test each fit their own imputers, encoder and scaler
    #[default]
    PerDataset,
    /// Transforms fitted on train are applied unchanged to test
    FitOnTrain,
}

/// Configuration for data preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Binary label column, present in the training data only
    pub target_column: String,

    /// Columns removed before anything else
    pub columns_to_drop: Vec<String>,

    /// Fail when a column to drop is absent
    pub strict_drop: bool,

    /// Count-like columns whose missing values mean zero
    pub sentinel_columns: Vec<String>,

    /// Strategy for handling missing numeric values
    pub numeric_impute_strategy: ImputeStrategy,

    /// Strategy for handling missing categorical values
    pub categorical_impute_strategy: ImputeStrategy,

    /// Handling of zero-variance columns while scaling
    pub constant_columns: ScalerPolicy,

    /// Fitting policy for imputers, encoder and scaler
    pub fit_policy: FitPolicy,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            target_column: "drafted".to_string(),
            columns_to_drop: vec!["pick".to_string(), "Rec_Rank".to_string()],
            strict_drop: true,
            sentinel_columns: [
                "rimmade",
                "rimmade_rimmiss",
                "midmade",
                "midmade_midmiss",
                "dunksmade",
                "dunksmiss_dunksmade",
                "rim_ratio",
                "mid_ratio",
                "dunks_ratio",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            numeric_impute_strategy: ImputeStrategy::Mean,
            categorical_impute_strategy: ImputeStrategy::MostFrequent,
            constant_columns: ScalerPolicy::Error,
            fit_policy: FitPolicy::PerDataset,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    pub fn with_columns_to_drop(mut self, columns: &[&str]) -> Self {
        self.columns_to_drop = columns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_sentinel_columns(mut self, columns: &[&str]) -> Self {
        self.sentinel_columns = columns.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Skip absent columns instead of failing when dropping
    pub fn with_lenient_drop(mut self) -> Self {
        self.strict_drop = false;
        self
    }

    pub fn with_fit_policy(mut self, policy: FitPolicy) -> Self {
        self.fit_policy = policy;
        self
    }

    pub fn with_constant_columns(mut self, policy: ScalerPolicy) -> Self {
        self.constant_columns = policy;
        self
    }
}
