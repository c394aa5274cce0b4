//! Model persistence and prediction
//!
//! Fitted classifiers are stored as JSON artifacts, one file per model, and
//! loaded back as a named set to score new feature tables.

mod registry;

pub use registry::{default_models, ModelRegistry, ModelSpec};

use crate::error::{DraftError, Result};
use crate::table::{Column, Table};
use crate::training::{AdaBoostClassifier, Classifier, LogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Any persisted classifier, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavedModel {
    Logistic(LogisticRegression),
    AdaBoost(AdaBoostClassifier),
}

impl Classifier for SavedModel {
    fn name(&self) -> &str {
        match self {
            SavedModel::Logistic(m) => Classifier::name(m),
            SavedModel::AdaBoost(m) => Classifier::name(m),
        }
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            SavedModel::Logistic(m) => Classifier::fit(m, x, y),
            SavedModel::AdaBoost(m) => Classifier::fit(m, x, y),
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            SavedModel::Logistic(m) => Classifier::predict_proba(m, x),
            SavedModel::AdaBoost(m) => Classifier::predict_proba(m, x),
        }
    }
}

/// A fitted model together with the feature columns it expects, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub model: SavedModel,
}

impl ModelArtifact {
    pub fn new(feature_names: Vec<String>, model: SavedModel) -> Self {
        Self {
            feature_names,
            model,
        }
    }

    /// Positive-class probabilities for the rows of `features`
    pub fn predict_proba(&self, features: &Table) -> Result<Array1<f64>> {
        let names: Vec<&str> = self.feature_names.iter().map(|s| s.as_str()).collect();
        let x = features.to_array2(&names)?;
        self.model.predict_proba(&x)
    }
}

/// Score `features` with every model, one probability column per model name
pub fn make_predictions(models: &[(String, ModelArtifact)], features: &Table) -> Result<Table> {
    if models.is_empty() {
        return Err(DraftError::ConfigError("no models to predict with".to_string()));
    }

    let columns = models
        .iter()
        .map(|(name, artifact)| {
            let proba = artifact.predict_proba(features)?;
            Ok(Column::numeric(name.clone(), proba.iter().map(|&p| Some(p)).collect()))
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(columns)
}
