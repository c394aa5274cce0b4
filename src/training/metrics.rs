//! Ranking metrics

use crate::error::{DraftError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Area under the ROC curve of `scores` against 0/1 labels.
///
/// Computed from average ranks, so tied scores count one half. Fails when
/// only one class is present.
pub fn roc_auc_score(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    if y_true.len() != scores.len() {
        return Err(DraftError::ShapeError {
            expected: format!("{} score(s)", y_true.len()),
            actual: format!("{} score(s)", scores.len()),
        });
    }

    let n_pos = y_true.iter().filter(|&&v| v > 0.5).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(DraftError::numeric(
            "y_true",
            "holds a single class, AUROC is undefined",
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average 1-based rank over each run of equal scores
    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let avg_rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
        start = end;
    }

    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&label, _)| label > 0.5)
        .map(|(_, &r)| r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Train and validation AUROC of one fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AurocReport {
    pub model: String,
    pub train: f64,
    pub validation: f64,
}

impl fmt::Display for AurocReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training AUROC Score: {:.2}", self.train)?;
        write!(f, "Validation AUROC Score: {:.2}", self.validation)
    }
}
