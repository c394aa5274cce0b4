//! End-to-end feature build: load, preprocess, balance, split, write

mod stage;

pub use stage::{Dataset, Stage};

use crate::error::{DraftError, Result};
use crate::preprocessing::{FeatureBuilder, PreprocessingConfig};
use crate::synthetic::{class_counts, BalanceConfig, Sampler};
use crate::table::{Column, Schema, Table};
use crate::training::{split_dataset, SplitConfig};
use crate::utils::{DataLoader, DatasetWriter};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// File names of the six split outputs
pub const OUTPUT_FILES: [&str; 6] = [
    "X_train.csv",
    "X_val.csv",
    "X_test.csv",
    "y_train.csv",
    "y_val.csv",
    "y_test.csv",
];

/// Processed test-set features, written on request
pub const PREDICT_FEATURES_FILE: &str = "X_predict.csv";

/// Full pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocessing: PreprocessingConfig,
    pub balance: BalanceConfig,
    pub split: SplitConfig,
    /// Also write the processed test features for prediction
    pub write_predict_features: bool,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DraftError::io(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| DraftError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    pub fn with_balance(mut self, balance: BalanceConfig) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    /// Use one seed for balancing and splitting
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.balance.seed = seed;
        self.split.seed = seed;
        self
    }

    pub fn with_predict_features(mut self, write: bool) -> Self {
        self.write_predict_features = write;
        self
    }
}

/// Input and output locations of one run
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub output_dir: PathBuf,
}

impl PipelinePaths {
    pub fn new(train: impl Into<PathBuf>, test: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            train: train.into(),
            test: test.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Row counts of the three splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Rows read, (train, test)
    pub rows_loaded: (usize, usize),
    /// Rows left after row filtering, (train, test)
    pub rows_after_filter: (usize, usize),
    pub schema: Schema,
    pub class_counts_before: BTreeMap<i64, usize>,
    pub class_counts_after: BTreeMap<i64, usize>,
    pub split_sizes: SplitSizes,
    pub outputs: Vec<PathBuf>,
    pub elapsed_secs: f64,
}

/// Read the target column as binary labels
pub fn target_labels(column: &Column) -> Result<Array1<i64>> {
    let values = column
        .to_dense()
        .map_err(|_| DraftError::schema(column.name(), "must hold complete numeric 0/1 labels"))?;
    values
        .iter()
        .map(|&v| {
            if v == 0.0 || v == 1.0 {
                Ok(v as i64)
            } else {
                Err(DraftError::schema(
                    column.name(),
                    format!("holds label {} but must be 0 or 1", v),
                ))
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(Array1::from_vec)
}

/// Run every stage on the train and test files and write the splits
pub fn run_pipeline(config: &PipelineConfig, paths: &PipelinePaths) -> Result<PipelineReport> {
    let start = Instant::now();
    let target = config.preprocessing.target_column.as_str();
    let loader = DataLoader::new();

    let train = loader
        .load_csv(&paths.train)
        .map_err(|e| e.in_stage(Stage::Load, Dataset::Train))?;
    let test = loader
        .load_csv(&paths.test)
        .map_err(|e| e.in_stage(Stage::Load, Dataset::Test))?;
    if !train.contains(target) {
        return Err(DraftError::schema(target, "target column is missing from the training data")
            .in_stage(Stage::Load, Dataset::Train));
    }
    let rows_loaded = (train.n_rows(), test.n_rows());
    info!(train_rows = rows_loaded.0, test_rows = rows_loaded.1, "Loaded datasets");

    let prepared = FeatureBuilder::with_config(config.preprocessing.clone()).build(&train, &test)?;

    let (features, target_column) = prepared
        .train
        .split_off(target)
        .map_err(|e| e.in_stage(Stage::Balance, Dataset::Train))?;
    let feature_names: Vec<String> = features.column_names().iter().map(|s| s.to_string()).collect();
    let (x, y) = target_labels(&target_column)
        .and_then(|y| Ok((features.to_feature_matrix()?, y)))
        .map_err(|e| e.in_stage(Stage::Balance, Dataset::Train))?;

    let class_counts_before = class_counts(&y);
    let balanced = config
        .balance
        .sampler()
        .fit_resample(&x, &y)
        .map_err(|e| e.in_stage(Stage::Balance, Dataset::Train))?;
    let class_counts_after = class_counts(&balanced.y);
    info!(
        before = ?class_counts_before,
        after = ?class_counts_after,
        "Balanced classes"
    );

    let splits = split_dataset(&balanced.x, &balanced.y, &config.split)
        .map_err(|e| e.in_stage(Stage::Split, Dataset::Train))?;
    let (n_train, n_val, n_test) = splits.sizes();

    let to_tables = || -> Result<Vec<Table>> {
        Ok(vec![
            Table::from_array2(&feature_names, &splits.x_train)?,
            Table::from_array2(&feature_names, &splits.x_val)?,
            Table::from_array2(&feature_names, &splits.x_test)?,
            Table::from_labels(target, &splits.y_train),
            Table::from_labels(target, &splits.y_val),
            Table::from_labels(target, &splits.y_test),
        ])
    };
    let mut tables = to_tables().map_err(|e| e.in_stage(Stage::Split, Dataset::Train))?;
    let mut names: Vec<&str> = OUTPUT_FILES.to_vec();

    if config.write_predict_features {
        let columns: Vec<&str> = feature_names.iter().map(|s| s.as_str()).collect();
        let predict = prepared
            .test
            .to_array2(&columns)
            .and_then(|x| Table::from_array2(&feature_names, &x))
            .map_err(|e| e.in_stage(Stage::Write, Dataset::Test))?;
        tables.push(predict);
        names.push(PREDICT_FEATURES_FILE);
    }

    let outputs: Vec<(&str, &Table)> = names.iter().copied().zip(tables.iter()).collect();
    let written = DatasetWriter::new(&paths.output_dir)
        .commit(&outputs)
        .map_err(|e| e.in_stage(Stage::Write, Dataset::Train))?;

    let report = PipelineReport {
        rows_loaded,
        rows_after_filter: prepared.rows_after_filter,
        schema: prepared.schema,
        class_counts_before,
        class_counts_after,
        split_sizes: SplitSizes {
            train: n_train,
            validation: n_val,
            test: n_test,
        },
        outputs: written,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };

    info!(
        train = n_train,
        validation = n_val,
        test = n_test,
        features = feature_names.len(),
        elapsed_secs = report.elapsed_secs,
        "Feature build complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_labels() {
        let col = Column::numeric("drafted", vec![Some(0.0), Some(1.0), Some(1.0)]);
        assert_eq!(target_labels(&col).unwrap(), ndarray::array![0, 1, 1]);

        let bad = Column::numeric("drafted", vec![Some(0.0), Some(2.0)]);
        assert!(matches!(target_labels(&bad), Err(DraftError::Schema { .. })));

        let text = Column::text("drafted", vec![Some("yes")]);
        assert!(target_labels(&text).is_err());
    }

    #[test]
    fn test_config_json_overrides() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"balance": {"k_neighbors": 3}, "split": {"seed": 11}}"#,
        )
        .unwrap();
        assert_eq!(config.balance.k_neighbors, 3);
        assert_eq!(config.balance.seed, 8);
        assert_eq!(config.split.seed, 11);
        assert_eq!(config.preprocessing.target_column, "drafted");
    }

    #[test]
    fn test_with_seed_sets_both() {
        let config = PipelineConfig::new().with_seed(21);
        assert_eq!(config.balance.seed, 21);
        assert_eq!(config.split.seed, 21);
    }
}
