//! Linear model implementations

use super::Classifier;
use crate::error::{DraftError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Expand features to polynomial terms: `x_i`, then `x_i * x_j` for `i <= j`
fn expand_features(x: &Array2<f64>, degree: usize) -> Array2<f64> {
    if degree < 2 {
        return x.clone();
    }

    let n = x.nrows();
    let p = x.ncols();
    let pairs: Vec<(usize, usize)> = (0..p).flat_map(|i| (i..p).map(move |j| (i, j))).collect();

    Array2::from_shape_fn((n, p + pairs.len()), |(row, col)| {
        if col < p {
            x[[row, col]]
        } else {
            let (i, j) = pairs[col - p];
            x[[row, i]] * x[[row, j]]
        }
    })
}

/// Logistic regression fitted by gradient descent with L2 regularization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Polynomial degree of the feature expansion (1 = none)
    pub degree: usize,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
    /// Number of input features seen during fit
    n_features: usize,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            degree: 1,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            n_features: 0,
            is_fitted: false,
        }
    }

    /// Logistic regression on degree-2 polynomial features
    pub fn polynomial(degree: usize) -> Self {
        Self::new().with_degree(degree)
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree.clamp(1, 2);
        self
    }

    /// Set regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sigmoid function
    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit the model using gradient descent
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

        let x_expanded = expand_features(x, self.degree);
        let mut weights = Array1::zeros(x_expanded.ncols());
        let mut bias = 0.0;

        let lr = self.learning_rate;
        let alpha = self.alpha;

        for _iter in 0..self.max_iter {
            let linear = x_expanded.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y;
            let dw = (x_expanded.t().dot(&errors) / n_samples as f64) + (alpha * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - lr * dw;
            bias -= lr * db;
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.n_features = x.ncols();
        self.is_fitted = true;

        Ok(self)
    }

    /// Predict positive-class probabilities
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(DraftError::ModelNotFitted),
        };
        if x.ncols() != self.n_features {
            return Err(DraftError::ShapeError {
                expected: format!("{} feature(s)", self.n_features),
                actual: format!("{} feature(s)", x.ncols()),
            });
        }

        let linear = expand_features(x, self.degree).dot(coefficients) + self.intercept.unwrap_or(0.0);
        Ok(Self::sigmoid(&linear))
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        if self.degree > 1 {
            "polynomial_logistic_regression"
        } else {
            "logistic_regression"
        }
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        LogisticRegression::fit(self, x, y).map(|_| ())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LogisticRegression::predict_proba(self, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_expand_features_degree_2() {
        let x = array![[2.0, 3.0]];
        let expanded = expand_features(&x, 2);
        assert_eq!(expanded, array![[2.0, 3.0, 4.0, 6.0, 9.0]]);
        assert_eq!(expand_features(&x, 1), x);
    }

    #[test]
    fn test_logistic_regression_separable() {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = LogisticRegression::new()
            .with_max_iter(1000)
            .with_learning_rate(0.5);
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        assert_eq!(pred, y);
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_polynomial_fits_circular_boundary() {
        // positives inside the unit circle, negatives outside
        let x = array![
            [0.0, 0.0], [0.3, 0.2], [-0.2, 0.3], [0.1, -0.3],
            [2.0, 0.0], [0.0, 2.0], [-2.0, 0.1], [0.2, -2.0]
        ];
        let y = array![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];

        let mut model = LogisticRegression::polynomial(2).with_max_iter(3000);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LogisticRegression::new();
        assert!(matches!(
            model.predict_proba(&array![[1.0]]),
            Err(DraftError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let mut model = LogisticRegression::new();
        model.fit(&array![[1.0], [-1.0]], &array![1.0, 0.0]).unwrap();
        assert!(matches!(
            model.predict_proba(&array![[1.0, 2.0]]),
            Err(DraftError::ShapeError { .. })
        ));
    }
}
