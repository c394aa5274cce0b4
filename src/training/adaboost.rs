//! AdaBoost (Adaptive Boosting) implementation
//!
//! AdaBoost builds an ensemble of weak learners (decision stumps), weighting
//! misclassified samples more heavily in subsequent rounds.

use super::Classifier;
use crate::error::{DraftError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// A single decision stump: splits on one feature at one threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Stump {
    feature_index: usize,
    threshold: f64,
    /// Prediction when feature <= threshold
    left_label: f64,
    /// Prediction when feature > threshold
    right_label: f64,
}

impl Stump {
    fn predict_sample(&self, sample: &ArrayView1<f64>) -> f64 {
        if sample[self.feature_index] <= self.threshold {
            self.left_label
        } else {
            self.right_label
        }
    }
}

/// Binary AdaBoost classifier (SAMME) over decision stumps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostClassifier {
    pub n_estimators: usize,
    pub learning_rate: f64,
    stumps: Vec<Stump>,
    alphas: Vec<f64>,
    n_features: usize,
    pub is_fitted: bool,
}

impl Default for AdaBoostClassifier {
    fn default() -> Self {
        Self::new(50, 1.0)
    }
}

impl AdaBoostClassifier {
    pub fn new(n_estimators: usize, learning_rate: f64) -> Self {
        Self {
            n_estimators,
            learning_rate,
            stumps: Vec::new(),
            alphas: Vec::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Number of boosting rounds actually kept
    pub fn n_rounds(&self) -> usize {
        self.stumps.len()
    }

    /// Find the stump with the lowest weighted error.
    ///
    /// Each feature is swept once in sorted order, keeping running sums of
    /// positive and negative weight to the left of the candidate threshold.
    fn fit_stump(x: &Array2<f64>, y: &Array1<f64>, weights: &Array1<f64>) -> (Stump, f64) {
        let n_samples = x.nrows();
        let total_pos: f64 = (0..n_samples).filter(|&i| y[i] > 0.5).map(|i| weights[i]).sum();
        let total_neg: f64 = weights.sum() - total_pos;

        // Constant prediction of the heavier class
        let majority = if total_pos >= total_neg { 1.0 } else { 0.0 };
        let mut best_stump = Stump {
            feature_index: 0,
            threshold: f64::MAX,
            left_label: majority,
            right_label: majority,
        };
        let mut best_error = total_pos.min(total_neg);

        let mut order: Vec<usize> = (0..n_samples).collect();
        for f in 0..x.ncols() {
            let col = x.column(f);
            order.sort_by(|&a, &b| col[a].total_cmp(&col[b]));

            let mut left_pos = 0.0;
            let mut left_neg = 0.0;
            for k in 0..n_samples.saturating_sub(1) {
                let i = order[k];
                if y[i] > 0.5 {
                    left_pos += weights[i];
                } else {
                    left_neg += weights[i];
                }

                let (lo, hi) = (col[i], col[order[k + 1]]);
                if lo == hi {
                    continue;
                }

                // left predicts 0, right predicts 1, and the reverse
                let err_left_neg = left_pos + (total_neg - left_neg);
                let err_left_pos = left_neg + (total_pos - left_pos);
                let (error, left_label, right_label) = if err_left_neg <= err_left_pos {
                    (err_left_neg, 0.0, 1.0)
                } else {
                    (err_left_pos, 1.0, 0.0)
                };

                if error < best_error {
                    best_error = error;
                    best_stump = Stump {
                        feature_index: f,
                        threshold: (lo + hi) / 2.0,
                        left_label,
                        right_label,
                    };
                }
            }
        }

        (best_stump, best_error)
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(DraftError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(DraftError::DataError("cannot fit on an empty dataset".to_string()));
        }

        let mut weights = Array1::from_elem(n_samples, 1.0 / n_samples as f64);
        self.stumps.clear();
        self.alphas.clear();

        for _round in 0..self.n_estimators {
            let (stump, raw_error) = Self::fit_stump(x, y, &weights);
            let error = raw_error / weights.sum();

            // No better than chance: further rounds add nothing
            if error >= 0.5 {
                break;
            }

            let perfect = error <= 1e-10;
            let error = error.max(1e-10);
            let alpha = self.learning_rate * ((1.0 - error) / error).ln();

            for i in 0..n_samples {
                if (stump.predict_sample(&x.row(i)) - y[i]).abs() > 1e-10 {
                    weights[i] *= alpha.exp();
                }
            }
            let w_sum = weights.sum();
            if w_sum > 0.0 {
                weights /= w_sum;
            }

            self.stumps.push(stump);
            self.alphas.push(alpha);

            if perfect {
                break;
            }
        }

        self.n_features = x.ncols();
        self.is_fitted = true;
        Ok(self)
    }

    /// Positive-class probability from the normalized weighted vote
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(DraftError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(DraftError::ShapeError {
                expected: format!("{} feature(s)", self.n_features),
                actual: format!("{} feature(s)", x.ncols()),
            });
        }

        let total: f64 = self.alphas.iter().sum();
        let proba = x
            .rows()
            .into_iter()
            .map(|row| {
                if total <= 0.0 {
                    return 0.5;
                }
                // vote in [-1, 1]: +alpha for class 1, -alpha for class 0
                let vote: f64 = self
                    .stumps
                    .iter()
                    .zip(self.alphas.iter())
                    .map(|(stump, &alpha)| {
                        if stump.predict_sample(&row) > 0.5 {
                            alpha
                        } else {
                            -alpha
                        }
                    })
                    .sum::<f64>()
                    / total;
                1.0 / (1.0 + (-vote).exp())
            })
            .collect();

        Ok(proba)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }
}

impl Classifier for AdaBoostClassifier {
    fn name(&self) -> &str {
        "adaboost"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        AdaBoostClassifier::fit(self, x, y).map(|_| ())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        AdaBoostClassifier::predict_proba(self, x)
    }
}
