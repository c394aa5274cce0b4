//! Feature-building pipeline: cleaning followed by the fitted transforms

use super::{
    cleaning,
    config::{FitPolicy, PreprocessingConfig},
    encoder::LabelEncoder,
    imputer::Imputer,
    scaler::StandardScaler,
};
use crate::error::{DraftError, Result};
use crate::runner::{Dataset, Stage};
use crate::table::{Schema, Table};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Fitted state of the transform stages for one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformState {
    numeric_imputer: Imputer,
    categorical_imputer: Imputer,
    encoder: LabelEncoder,
    scaler: StandardScaler,
}

impl TransformState {
    /// Fit every transform stage in order, each on the previous stage's output
    pub fn fit_transform(
        config: &PreprocessingConfig,
        schema: &Schema,
        table: &Table,
        dataset: Dataset,
    ) -> Result<(Self, Table)> {
        let numeric = schema.numeric_columns();
        let categorical = schema.categorical_columns();

        let mut state = Self {
            numeric_imputer: Imputer::new(config.numeric_impute_strategy.clone()),
            categorical_imputer: Imputer::new(config.categorical_impute_strategy.clone()),
            encoder: LabelEncoder::new(),
            scaler: StandardScaler::new(config.constant_columns),
        };

        let mut current = table.clone();
        for stage in Stage::TRANSFORMS {
            let started = Instant::now();
            current = match stage {
                Stage::ImputeNumeric => state.numeric_imputer.fit_transform(&current, &numeric),
                Stage::ImputeCategorical => {
                    state.categorical_imputer.fit_transform(&current, &categorical)
                }
                Stage::Encode => state.encoder.fit_transform(&current, &categorical),
                Stage::Scale => state.scaler.fit_transform(&current, &numeric),
                _ => unreachable!("not a transform stage"),
            }
            .map_err(|e| e.in_stage(stage, dataset))?;
            log_stage(stage, dataset, &current, started);
        }

        Ok((state, current))
    }

    /// Apply previously fitted transforms without refitting
    pub fn transform(&self, table: &Table, dataset: Dataset) -> Result<Table> {
        let mut current = table.clone();
        for stage in Stage::TRANSFORMS {
            let started = Instant::now();
            current = match stage {
                Stage::ImputeNumeric => self.numeric_imputer.transform(&current),
                Stage::ImputeCategorical => self.categorical_imputer.transform(&current),
                Stage::Encode => self.encoder.transform(&current),
                Stage::Scale => self.scaler.transform(&current),
                _ => unreachable!("not a transform stage"),
            }
            .map_err(|e| e.in_stage(stage, dataset))?;
            log_stage(stage, dataset, &current, started);
        }
        Ok(current)
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

/// Train and test tables after every preprocessing stage
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub train: Table,
    pub test: Table,
    pub schema: Schema,
    pub train_state: TransformState,
    pub test_state: TransformState,
    /// Rows left after row filtering, (train, test)
    pub rows_after_filter: (usize, usize),
}

/// Runs the cleaning and transform stages on a train/test pair
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    config: PreprocessingConfig,
}

impl FeatureBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::with_config(PreprocessingConfig::default())
    }

    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Drop configured columns, fill sentinel columns, then drop incomplete rows
    pub fn clean(&self, table: &Table, dataset: Dataset) -> Result<Table> {
        let mut current = table.clone();
        for stage in Stage::CLEANING {
            let started = Instant::now();
            current = match stage {
                Stage::DropColumns => cleaning::drop_columns(
                    &current,
                    &self.config.columns_to_drop,
                    self.config.strict_drop,
                ),
                Stage::SentinelImpute => {
                    cleaning::fill_sentinels(&current, &self.config.sentinel_columns)
                }
                Stage::FilterRows => Ok(cleaning::drop_incomplete_rows(&current)),
                _ => unreachable!("not a cleaning stage"),
            }
            .map_err(|e| e.in_stage(stage, dataset))?;
            log_stage(stage, dataset, &current, started);
        }
        Ok(current)
    }

    /// Infer column kinds from the cleaned training table
    pub fn infer_schema(&self, train: &Table) -> Schema {
        Schema::infer(train, &[self.config.target_column.as_str()])
    }

    /// Clean both datasets and apply the fitted transforms per the fit policy
    pub fn build(&self, train: &Table, test: &Table) -> Result<PreparedData> {
        let train = self.clean(train, Dataset::Train)?;
        let test = self.clean(test, Dataset::Test)?;
        let rows_after_filter = (train.n_rows(), test.n_rows());

        let schema = self.infer_schema(&train);
        if schema.is_empty() {
            return Err(DraftError::ConfigError(
                "no feature columns left after cleaning".to_string(),
            ));
        }
        self.check_test_columns(&schema, &test)
            .map_err(|e| e.in_stage(Stage::DropColumns, Dataset::Test))?;
        info!(
            numeric = schema.numeric_columns().len(),
            categorical = schema.categorical_columns().len(),
            "Inferred feature schema"
        );

        let (train_state, train) =
            TransformState::fit_transform(&self.config, &schema, &train, Dataset::Train)?;

        let (test_state, test) = match self.config.fit_policy {
            FitPolicy::PerDataset => {
                TransformState::fit_transform(&self.config, &schema, &test, Dataset::Test)?
            }
            FitPolicy::FitOnTrain => {
                let test = train_state.transform(&test, Dataset::Test)?;
                (train_state.clone(), test)
            }
        };

        Ok(PreparedData {
            train,
            test,
            schema,
            train_state,
            test_state,
            rows_after_filter,
        })
    }

    /// Test data must carry exactly the schema columns, the target aside
    fn check_test_columns(&self, schema: &Schema, test: &Table) -> Result<()> {
        schema.validate(test)?;
        match test
            .column_names()
            .into_iter()
            .find(|name| *name != self.config.target_column && schema.kind_of(name).is_none())
        {
            Some(extra) => Err(DraftError::schema(extra, "is not present in the training data")),
            None => Ok(()),
        }
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn log_stage(stage: Stage, dataset: Dataset, table: &Table, started: Instant) {
    debug!(
        stage = %stage,
        dataset = %dataset,
        rows = table.n_rows(),
        columns = table.n_cols(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Stage complete"
    );
}
