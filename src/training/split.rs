//! Seeded train/validation/test splitting

use crate::error::{DraftError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Split proportions and seed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of all rows held out as the test set
    pub test_size: f64,
    /// Share of the remaining rows held out as the validation set
    pub validation_size: f64,
    /// Seed used for both shuffles
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            validation_size: 0.2,
            seed: 8,
        }
    }
}

impl SplitConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sizes(mut self, test_size: f64, validation_size: f64) -> Self {
        self.test_size = test_size;
        self.validation_size = validation_size;
        self
    }
}

/// Six aligned subsets
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub x_train: Array2<f64>,
    pub x_val: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<i64>,
    pub y_val: Array1<i64>,
    pub y_test: Array1<i64>,
}

impl DatasetSplits {
    /// Row counts of (train, validation, test)
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.x_train.nrows(), self.x_val.nrows(), self.x_test.nrows())
    }
}

/// Shuffle rows and hold out `ceil(test_size * n)` of them.
///
/// Returns `(x_rest, x_test, y_rest, y_test)`. Unstratified and without
/// replacement; the same seed always yields the same partition.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<i64>,
    test_size: f64,
    seed: u64,
) -> Result<(Array2<f64>, Array2<f64>, Array1<i64>, Array1<i64>)> {
    let n_samples = x.nrows();
    if n_samples != y.len() {
        return Err(DraftError::ShapeError {
            expected: format!("{} label(s)", n_samples),
            actual: format!("{} label(s)", y.len()),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DraftError::ConfigError(format!(
            "test size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(DraftError::DataError(format!(
            "cannot hold out {} of {} row(s) and keep a non-empty remainder",
            n_test, n_samples
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, rest_idx) = indices.split_at(n_test);

    Ok((
        x.select(Axis(0), rest_idx),
        x.select(Axis(0), test_idx),
        y.select(Axis(0), rest_idx),
        y.select(Axis(0), test_idx),
    ))
}

/// Split into test first, then carve validation out of the remainder
pub fn split_dataset(x: &Array2<f64>, y: &Array1<i64>, config: &SplitConfig) -> Result<DatasetSplits> {
    let (x_data, x_test, y_data, y_test) = train_test_split(x, y, config.test_size, config.seed)?;
    let (x_train, x_val, y_train, y_val) =
        train_test_split(&x_data, &y_data, config.validation_size, config.seed)?;

    Ok(DatasetSplits {
        x_train,
        x_val,
        x_test,
        y_train,
        y_val,
        y_test,
    })
}
