//! Missing value imputation strategies

use crate::error::{DraftError, Result};
use crate::table::{Column, ColumnData, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with mean (numeric only)
    Mean,
    /// Replace with mode / most frequent value, smallest value on ties
    MostFrequent,
    /// Replace with a constant value (rendered as text for text columns)
    Constant(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ImputeValue {
    Numeric(f64),
    Text(String),
}

/// Imputer for handling missing values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the imputer to the named columns of `table`
    pub fn fit(&mut self, table: &Table, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = table.require(col_name)?;
            let fill_value = self.compute_fill_value(column)?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace missing values in every fitted column
    pub fn transform(&self, table: &Table) -> Result<Table> {
        if !self.is_fitted {
            return Err(DraftError::ModelNotFitted);
        }

        let mut result = table.clone();
        for (col_name, fill_value) in &self.fill_values {
            let column = table.require(col_name)?;
            result = result.with_column(Self::fill_column(column, fill_value)?)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, table: &Table, columns: &[&str]) -> Result<Table> {
        self.fit(table, columns)?;
        self.transform(table)
    }

    /// Value a fitted column's gaps are filled with, as text
    pub fn fill_value(&self, column: &str) -> Option<String> {
        self.fill_values.get(column).map(|v| match v {
            ImputeValue::Numeric(x) => x.to_string(),
            ImputeValue::Text(s) => s.clone(),
        })
    }

    fn compute_fill_value(&self, column: &Column) -> Result<ImputeValue> {
        match (&self.strategy, column.data()) {
            (ImputeStrategy::Constant(c), ColumnData::Numeric(_)) => Ok(ImputeValue::Numeric(*c)),
            (ImputeStrategy::Constant(c), ColumnData::Text(_)) => Ok(ImputeValue::Text(c.to_string())),
            (ImputeStrategy::Mean, ColumnData::Numeric(values)) => {
                let observed: Vec<f64> = values.iter().flatten().copied().collect();
                if observed.is_empty() {
                    return Err(DraftError::numeric(column.name(), "has no observed values to average"));
                }
                Ok(ImputeValue::Numeric(observed.iter().sum::<f64>() / observed.len() as f64))
            }
            (ImputeStrategy::Mean, ColumnData::Text(_)) => {
                Err(DraftError::schema(column.name(), "is not numeric, cannot impute with mean"))
            }
            (ImputeStrategy::MostFrequent, ColumnData::Numeric(values)) => {
                Self::compute_mode_numeric(values)
                    .map(ImputeValue::Numeric)
                    .ok_or_else(|| DraftError::numeric(column.name(), "has no observed values"))
            }
            (ImputeStrategy::MostFrequent, ColumnData::Text(values)) => {
                Self::compute_mode_string(values)
                    .map(ImputeValue::Text)
                    .ok_or_else(|| DraftError::numeric(column.name(), "has no observed values"))
            }
        }
    }

    /// Compute mode (most frequent value) for a numeric column
    fn compute_mode_numeric(values: &[Option<f64>]) -> Option<f64> {
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        longest_run(&sorted, |a, b| a == b).copied()
    }

    /// Compute mode for a text column
    fn compute_mode_string(values: &[Option<String>]) -> Option<String> {
        let mut sorted: Vec<&String> = values.iter().flatten().collect();
        sorted.sort();
        longest_run(&sorted, |a, b| a == b).map(|s| s.to_string())
    }

    fn fill_column(column: &Column, fill_value: &ImputeValue) -> Result<Column> {
        let data = match (column.data(), fill_value) {
            (ColumnData::Numeric(values), ImputeValue::Numeric(fill)) => {
                ColumnData::Numeric(values.iter().map(|v| Some(v.unwrap_or(*fill))).collect())
            }
            (ColumnData::Text(values), ImputeValue::Text(fill)) => ColumnData::Text(
                values
                    .iter()
                    .map(|v| Some(v.clone().unwrap_or_else(|| fill.clone())))
                    .collect(),
            ),
            _ => {
                return Err(DraftError::schema(
                    column.name(),
                    "changed type between fit and transform",
                ))
            }
        };
        Ok(Column::new(column.name(), data))
    }
}

/// First element of the longest run of equal neighbours in sorted data.
/// Earlier runs win ties, so the smallest modal value is chosen.
fn longest_run<T>(sorted: &[T], eq: impl Fn(&T, &T) -> bool) -> Option<&T> {
    let mut best: Option<(&T, usize)> = None;
    let mut start = 0;
    for i in 1..=sorted.len() {
        if i == sorted.len() || !eq(&sorted[i], &sorted[start]) {
            let len = i - start;
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((&sorted[start], len));
            }
            start = i;
        }
    }
    best.map(|(v, _)| v)
}
