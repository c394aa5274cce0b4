//! In-memory tabular data
//!
//! A [`Table`] is an ordered set of uniquely named columns aligned by row
//! index. Every column is either numeric or textual and may hold missing
//! values. Transformations never mutate a table in place; they return a new
//! one.

mod schema;

pub use schema::{ColumnKind, Schema};

use crate::error::{DraftError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::{DataFrame, DataType};
use std::collections::HashSet;

/// Values of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => v[row].is_none(),
            ColumnData::Text(v) => v[row].is_none(),
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Kind this data would be classified as by runtime inspection
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Categorical,
        }
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Text(v) => {
                ColumnData::Text(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
    /// Numeric values are whole numbers and are written without a fraction
    integer: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
            integer: false,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    /// Integer class labels, kept numeric and written as integers
    pub fn labels(name: impl Into<String>, values: &[i64]) -> Self {
        let data = ColumnData::Numeric(values.iter().map(|&v| Some(v as f64)).collect());
        Self {
            integer: true,
            ..Self::new(name, data)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric values, or a schema error for text columns
    pub fn as_numeric(&self) -> Result<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Text(_) => Err(DraftError::schema(&self.name, "is not numeric")),
        }
    }

    /// Numeric values with no gaps
    pub fn to_dense(&self) -> Result<Vec<f64>> {
        self.as_numeric()?
            .iter()
            .map(|v| v.ok_or_else(|| DraftError::schema(&self.name, "contains missing values")))
            .collect()
    }

    fn to_polars(&self) -> polars::prelude::Column {
        let name = self.name.as_str().into();
        match &self.data {
            ColumnData::Numeric(v) if self.integer => {
                let whole: Vec<Option<i64>> = v.iter().map(|x| x.map(|f| f as i64)).collect();
                polars::prelude::Column::new(name, whole)
            }
            ColumnData::Numeric(v) => polars::prelude::Column::new(name, v.clone()),
            ColumnData::Text(v) => polars::prelude::Column::new(name, v.clone()),
        }
    }
}

/// Ordered collection of equally long, uniquely named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking name uniqueness and row alignment
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DraftError::schema(&col.name, "appears more than once"));
            }
        }
        if let Some(first) = columns.first() {
            let n_rows = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
                return Err(DraftError::ShapeError {
                    expected: format!("{} rows", n_rows),
                    actual: format!("{} rows in column '{}'", bad.len(), bad.name),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column lookup that fails with a schema error
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| DraftError::schema(name, "not found"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Total number of missing cells
    pub fn null_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.null_count()).sum()
    }

    /// Table without the named columns; names that are absent are ignored
    pub fn without(&self, names: &[&str]) -> Table {
        let columns = self
            .columns
            .iter()
            .filter(|c| !names.contains(&c.name()))
            .cloned()
            .collect();
        Table { columns }
    }

    /// Table with `column` replacing the column of the same name
    pub fn with_column(&self, column: Column) -> Result<Table> {
        if column.len() != self.n_rows() && self.n_cols() > 0 {
            return Err(DraftError::ShapeError {
                expected: format!("{} rows", self.n_rows()),
                actual: format!("{} rows in column '{}'", column.len(), column.name),
            });
        }
        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name == column.name) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Ok(Table { columns })
    }

    /// Rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.take(indices),
                integer: c.integer,
            })
            .collect();
        Table { columns }
    }

    /// Rows for which `keep` is true
    pub fn filter(&self, keep: &[bool]) -> Table {
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| i)
            .collect();
        self.take(&indices)
    }

    /// Split a column off the table, returning the rest and the column
    pub fn split_off(&self, name: &str) -> Result<(Table, Column)> {
        let column = self.require(name)?.clone();
        Ok((self.without(&[name]), column))
    }

    /// Dense row-major matrix of the given numeric columns
    pub fn to_array2(&self, names: &[&str]) -> Result<Array2<f64>> {
        let col_data: Vec<Vec<f64>> = names
            .iter()
            .map(|name| self.require(name)?.to_dense())
            .collect::<Result<Vec<_>>>()?;

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        Ok(Array2::from_shape_fn((self.n_rows(), names.len()), |(r, c)| {
            col_refs[c][r]
        }))
    }

    /// Dense matrix of every column, in table order
    pub fn to_feature_matrix(&self) -> Result<Array2<f64>> {
        let names = self.column_names();
        self.to_array2(&names)
    }

    /// Build a numeric table from a matrix and its column names
    pub fn from_array2(names: &[String], x: &Array2<f64>) -> Result<Table> {
        if names.len() != x.ncols() {
            return Err(DraftError::ShapeError {
                expected: format!("{} columns", names.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }
        let columns = names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                Column::numeric(name.clone(), x.column(j).iter().map(|&v| Some(v)).collect())
            })
            .collect();
        Table::new(columns)
    }

    /// Single-column table holding a label vector
    pub fn from_labels(name: &str, y: &Array1<i64>) -> Table {
        let labels = y.to_vec();
        Table {
            columns: vec![Column::labels(name, &labels)],
        }
    }

    /// Convert a loaded polars frame. Numeric dtypes become numeric columns
    /// (NaN counts as missing), every other dtype becomes text.
    pub fn from_frame(df: &DataFrame) -> Result<Table> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let name = series.name().to_string();
            let data = if series.dtype().is_primitive_numeric() {
                let values = series.cast(&DataType::Float64)?;
                ColumnData::Numeric(
                    values
                        .f64()?
                        .into_iter()
                        .map(|v| v.filter(|x| !x.is_nan()))
                        .collect(),
                )
            } else {
                let values = series.cast(&DataType::String)?;
                ColumnData::Text(
                    values
                        .str()?
                        .into_iter()
                        .map(|v| v.map(str::to_string))
                        .collect(),
                )
            };
            columns.push(Column::new(name, data));
        }
        Table::new(columns)
    }

    /// Convert into a polars frame for writing
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<polars::prelude::Column> =
            self.columns.iter().map(|c| c.to_polars()).collect();
        Ok(DataFrame::new(columns)?)
    }
}
