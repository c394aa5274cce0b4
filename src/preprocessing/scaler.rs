//! Feature standardization

use crate::error::{DraftError, Result};
use crate::table::{Column, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a column whose standard deviation is zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalerPolicy {
    /// Fail with a numeric error naming the column
    #[default]
    Error,
    /// Center only; the column becomes all zeros
    Passthrough,
}

/// Parameters for a fitted column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: f64,
    pub std: f64,
}

/// Standard scaler: `(x - mean) / std` with population standard deviation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    policy: ScalerPolicy,
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new(ScalerPolicy::default())
    }
}

impl StandardScaler {
    /// Create a new scaler
    pub fn new(policy: ScalerPolicy) -> Self {
        Self {
            policy,
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit per-column mean and standard deviation
    pub fn fit(&mut self, table: &Table, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = table.require(col_name)?;
            let params = self.compute_params(column)?;
            self.params.insert(col_name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data
    pub fn transform(&self, table: &Table) -> Result<Table> {
        if !self.is_fitted {
            return Err(DraftError::ModelNotFitted);
        }

        let mut result = table.clone();
        for (col_name, params) in &self.params {
            let column = table.require(col_name)?;
            let scaled: Vec<Option<f64>> = column
                .as_numeric()?
                .iter()
                .map(|opt| opt.map(|v| (v - params.mean) / params.std))
                .collect();
            result = result.with_column(Column::numeric(col_name.clone(), scaled))?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, table: &Table, columns: &[&str]) -> Result<Table> {
        self.fit(table, columns)?;
        self.transform(table)
    }

    pub fn params(&self, column: &str) -> Option<ScalerParams> {
        self.params.get(column).copied()
    }

    fn compute_params(&self, column: &Column) -> Result<ScalerParams> {
        let values: Vec<f64> = column.as_numeric()?.iter().flatten().copied().collect();
        if values.is_empty() {
            return Err(DraftError::numeric(column.name(), "has no values to scale"));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();

        // Rounding leaves a tiny spread on constant columns
        if !std.is_finite() || std <= 10.0 * f64::EPSILON * mean.abs().max(1.0) {
            return match self.policy {
                ScalerPolicy::Error => Err(DraftError::numeric(
                    column.name(),
                    "has zero variance and cannot be standardized",
                )),
                ScalerPolicy::Passthrough => Ok(ScalerParams { mean, std: 1.0 }),
            };
        }

        Ok(ScalerParams { mean, std })
    }
}
