//! Model training module
//!
//! Dataset splitting plus the small set of binary classifiers fitted on the
//! processed draft features:
//! - Logistic regression, optionally on degree-2 polynomial features
//! - AdaBoost over decision stumps
//! - AUROC assessment on train and validation sets

pub mod adaboost;
mod assess;
pub mod linear_models;
mod metrics;
mod split;

pub use adaboost::AdaBoostClassifier;
pub use assess::fit_assess_classifier;
pub use linear_models::LogisticRegression;
pub use metrics::{roc_auc_score, AurocReport};
pub use split::{split_dataset, train_test_split, DatasetSplits, SplitConfig};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// A fitted-in-place binary classifier scoring the positive class
pub trait Classifier: Send + Sync {
    /// Model kind, used in logs and reports
    fn name(&self) -> &str;

    /// Fit on features `x` and 0/1 labels `y`
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Probability of the positive class for each row of `x`
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Labels as the floats the classifiers train on
pub fn labels_to_f64(y: &Array1<i64>) -> Array1<f64> {
    y.mapv(|v| v as f64)
}
