//! Fitting a classifier and scoring it on train and validation splits

use super::{roc_auc_score, AurocReport, Classifier};
use crate::error::Result;
use ndarray::{Array1, Array2};
use std::time::Instant;
use tracing::info;

/// Fit `model` on the training split and score it on both splits.
///
/// Returns the fitted model with its train and validation AUROC.
pub fn fit_assess_classifier<C: Classifier>(
    mut model: C,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    x_val: &Array2<f64>,
    y_val: &Array1<f64>,
) -> Result<(C, AurocReport)> {
    let start = Instant::now();
    model.fit(x_train, y_train)?;

    let train = roc_auc_score(y_train, &model.predict_proba(x_train)?)?;
    let validation = roc_auc_score(y_val, &model.predict_proba(x_val)?)?;

    info!(
        model = model.name(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Training AUROC Score: {:.2}",
        train
    );
    info!(model = model.name(), "Validation AUROC Score: {:.2}", validation);

    let report = AurocReport {
        model: model.name().to_string(),
        train,
        validation,
    };
    Ok((model, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{AdaBoostClassifier, LogisticRegression};
    use ndarray::array;

    #[test]
    fn test_fit_assess_separable() {
        let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let x_val = array![[-1.5], [1.5]];
        let y_val = array![0.0, 1.0];

        let (model, report) =
            fit_assess_classifier(LogisticRegression::new(), &x, &y, &x_val, &y_val).unwrap();
        assert!(model.is_fitted);
        assert!((report.train - 1.0).abs() < 1e-12);
        assert!((report.validation - 1.0).abs() < 1e-12);
        assert_eq!(report.model, "logistic_regression");
    }

    #[test]
    fn test_single_class_validation_fails() {
        let x = array![[0.0], [1.0]];
        let y = array![0.0, 1.0];
        let y_val = array![1.0, 1.0];
        assert!(
            fit_assess_classifier(AdaBoostClassifier::default(), &x, &y, &x, &y_val).is_err()
        );
    }
}
