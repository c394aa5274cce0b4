//! Label encoding for categorical columns

use crate::error::{DraftError, Result};
use crate::table::{Column, ColumnData, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sorted distinct values of one column; a value's position is its code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Categories {
    Text(Vec<String>),
    Numeric(Vec<f64>),
}

impl Categories {
    fn len(&self) -> usize {
        match self {
            Categories::Text(v) => v.len(),
            Categories::Numeric(v) => v.len(),
        }
    }
}

/// Label encoder: maps the `k` sorted distinct values of a column to `0..k-1`.
///
/// Text columns sort lexicographically by bytes, numeric columns numerically,
/// so re-encoding a column that already holds codes `0..k-1` leaves it as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    mappings: HashMap<String, Categories>,
    is_fitted: bool,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the encoder to the named columns
    pub fn fit(&mut self, table: &Table, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = table.require(col_name)?;
            let categories = Self::build_mapping(column.data());
            self.mappings.insert(col_name.to_string(), categories);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each fitted column with its integer codes
    pub fn transform(&self, table: &Table) -> Result<Table> {
        if !self.is_fitted {
            return Err(DraftError::ModelNotFitted);
        }

        let mut result = table.clone();
        for (col_name, categories) in &self.mappings {
            let column = table.require(col_name)?;
            result = result.with_column(Self::encode_column(column, categories)?)?;
        }
        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, table: &Table, columns: &[&str]) -> Result<Table> {
        self.fit(table, columns)?;
        self.transform(table)
    }

    /// Number of distinct categories seen for a column
    pub fn n_categories(&self, column: &str) -> Option<usize> {
        self.mappings.get(column).map(|c| c.len())
    }

    /// Categories of a text column in code order
    pub fn classes(&self, column: &str) -> Option<&[String]> {
        match self.mappings.get(column)? {
            Categories::Text(v) => Some(v),
            Categories::Numeric(_) => None,
        }
    }

    fn build_mapping(data: &ColumnData) -> Categories {
        match data {
            ColumnData::Text(values) => {
                let mut distinct: Vec<String> = values.iter().flatten().cloned().collect();
                distinct.sort();
                distinct.dedup();
                Categories::Text(distinct)
            }
            ColumnData::Numeric(values) => {
                let mut distinct: Vec<f64> = values.iter().flatten().copied().collect();
                distinct.sort_by(|a, b| a.total_cmp(b));
                distinct.dedup();
                Categories::Numeric(distinct)
            }
        }
    }

    fn encode_column(column: &Column, categories: &Categories) -> Result<Column> {
        let unseen = |value: String| {
            DraftError::schema(
                column.name(),
                format!("holds category '{}' that was not seen during fit", value),
            )
        };

        let codes: Vec<Option<f64>> = match (column.data(), categories) {
            (ColumnData::Text(values), Categories::Text(classes)) => values
                .iter()
                .map(|v| match v {
                    None => Ok(None),
                    Some(s) => classes
                        .binary_search(s)
                        .map(|code| Some(code as f64))
                        .map_err(|_| unseen(s.clone())),
                })
                .collect::<Result<_>>()?,
            (ColumnData::Numeric(values), Categories::Numeric(classes)) => values
                .iter()
                .map(|v| match v {
                    None => Ok(None),
                    Some(x) => classes
                        .binary_search_by(|c| c.total_cmp(x))
                        .map(|code| Some(code as f64))
                        .map_err(|_| unseen(x.to_string())),
                })
                .collect::<Result<_>>()?,
            _ => {
                return Err(DraftError::schema(
                    column.name(),
                    "changed type between fit and transform",
                ))
            }
        };

        Ok(Column::numeric(column.name(), codes))
    }
}
