//! SMOTE oversampling

use crate::error::{DraftError, Result};
use crate::synthetic::{class_counts, class_indices, ResampleResult, Sampler};
use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use tracing::debug;

/// Distance and row index; nearer first, then lower index
#[derive(Debug, Clone, Copy)]
struct DistIdx(f64, usize);

impl PartialEq for DistIdx {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for DistIdx {}
impl PartialOrd for DistIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DistIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0).then(self.1.cmp(&other.1))
    }
}

/// SMOTE (Synthetic Minority Over-sampling Technique).
///
/// Every class below the majority count is brought up to it. Each synthetic
/// row interpolates between a uniformly chosen class member and one of its
/// `k` nearest same-class neighbours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SMOTE {
    /// Number of nearest neighbors
    k_neighbors: usize,
    /// Random seed
    seed: u64,
    /// Target samples per class
    target_counts: Option<BTreeMap<i64, usize>>,
}

impl SMOTE {
    /// Create new SMOTE sampler
    pub fn new() -> Self {
        Self {
            k_neighbors: 5,
            seed: 8,
            target_counts: None,
        }
    }

    /// Set number of neighbors
    pub fn with_k_neighbors(mut self, k: usize) -> Self {
        self.k_neighbors = k.max(1);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn k_neighbors(&self) -> usize {
        self.k_neighbors
    }

    fn squared_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(ai, bi)| (ai - bi).powi(2)).sum()
    }

    /// Positions (within `members`) of the k nearest members to `members[pos]`,
    /// excluding itself, nearest first
    fn find_neighbors(x: &Array2<f64>, members: &[usize], pos: usize, k: usize) -> Vec<usize> {
        let point = x.row(members[pos]);
        let mut heap: BinaryHeap<DistIdx> = BinaryHeap::with_capacity(k + 1);

        for (j, &row) in members.iter().enumerate() {
            if j == pos {
                continue;
            }
            let candidate = DistIdx(Self::squared_distance(&point, &x.row(row)), j);
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate < *worst {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        heap.into_sorted_vec().into_iter().map(|DistIdx(_, j)| j).collect()
    }

    /// Generate synthetic sample between two points
    fn generate_sample(point: ArrayView1<f64>, neighbor: ArrayView1<f64>, rng: &mut StdRng) -> Vec<f64> {
        let gap: f64 = rng.gen();
        point
            .iter()
            .zip(neighbor.iter())
            .map(|(&p, &n)| p + gap * (n - p))
            .collect()
    }
}

impl Default for SMOTE {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SMOTE {
    fn fit(&mut self, _x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
        let counts = class_counts(y);
        let required = self.k_neighbors + 1;

        if counts.len() < 2 {
            // binary labels: report the class that is absent
            let missing = match counts.keys().next() {
                Some(&0) => 1,
                _ => 0,
            };
            return Err(DraftError::InsufficientData {
                class: missing,
                found: 0,
                required,
            });
        }

        if let Some((&class, &found)) = counts.iter().find(|(_, &c)| c < required) {
            return Err(DraftError::InsufficientData {
                class,
                found,
                required,
            });
        }

        let max_count = counts.values().copied().max().unwrap_or(0);
        self.target_counts = Some(counts.keys().map(|&class| (class, max_count)).collect());
        Ok(())
    }

    fn resample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult> {
        let targets = self.target_counts.as_ref().ok_or(DraftError::ModelNotFitted)?;
        if x.nrows() != y.len() {
            return Err(DraftError::ShapeError {
                expected: format!("{} label(s)", x.nrows()),
                actual: format!("{} label(s)", y.len()),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let indices = class_indices(y);

        // Collect only synthetic samples (original data reused from x directly)
        let mut synthetic_x: Vec<Vec<f64>> = Vec::new();
        let mut synthetic_y: Vec<i64> = Vec::new();
        let mut n_synthetic = Vec::with_capacity(targets.len());

        for (&class, &target_count) in targets {
            let members = indices.get(&class).map(|v| v.as_slice()).unwrap_or(&[]);
            let n_to_generate = target_count.saturating_sub(members.len());
            n_synthetic.push(n_to_generate);
            if n_to_generate == 0 {
                continue;
            }
            if members.len() <= self.k_neighbors {
                return Err(DraftError::InsufficientData {
                    class,
                    found: members.len(),
                    required: self.k_neighbors + 1,
                });
            }

            let neighbors: Vec<Vec<usize>> = (0..members.len())
                .into_par_iter()
                .map(|pos| Self::find_neighbors(x, members, pos, self.k_neighbors))
                .collect();

            for _ in 0..n_to_generate {
                let pos = rng.gen_range(0..members.len());
                let neighbor_pos = neighbors[pos][rng.gen_range(0..neighbors[pos].len())];
                synthetic_x.push(Self::generate_sample(
                    x.row(members[pos]),
                    x.row(members[neighbor_pos]),
                    &mut rng,
                ));
                synthetic_y.push(class);
            }

            debug!(class, generated = n_to_generate, "Generated synthetic samples");
        }

        // Build result: original rows + synthetic rows using from_shape_fn
        let n_original = x.nrows();
        let n_total = n_original + synthetic_x.len();
        let result_x = Array2::from_shape_fn((n_total, x.ncols()), |(i, j)| {
            if i < n_original {
                x[[i, j]]
            } else {
                synthetic_x[i - n_original][j]
            }
        });

        let mut all_y: Vec<i64> = y.iter().copied().collect();
        all_y.extend_from_slice(&synthetic_y);

        Ok(ResampleResult {
            x: result_x,
            y: Array1::from_vec(all_y),
            n_synthetic,
        })
    }
}
