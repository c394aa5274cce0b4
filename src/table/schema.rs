//! Column kinds, inferred once and threaded through every stage

use super::Table;
use crate::error::{DraftError, Result};
use serde::{Deserialize, Serialize};

/// Column data type for preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Ordered list of feature columns and their kinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<(String, ColumnKind)>,
}

impl Schema {
    pub fn new(fields: Vec<(String, ColumnKind)>) -> Self {
        Self { fields }
    }

    /// Classify every column of `table` except `exclude` by its value type
    pub fn infer(table: &Table, exclude: &[&str]) -> Self {
        let fields = table
            .columns()
            .iter()
            .filter(|c| !exclude.contains(&c.name()))
            .map(|c| (c.name().to_string(), c.data().kind()))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, ColumnKind)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnKind::Categorical)
    }

    fn columns_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Check that `table` carries every schema column
    pub fn validate(&self, table: &Table) -> Result<()> {
        for (name, _) in &self.fields {
            if !table.contains(name) {
                return Err(DraftError::schema(name, "is missing from the dataset"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_infer_kinds() {
        let table = Table::new(vec![
            Column::numeric("pts", vec![Some(10.0)]),
            Column::text("conf", vec![Some("ACC")]),
            Column::numeric("drafted", vec![Some(1.0)]),
        ])
        .unwrap();

        let schema = Schema::infer(&table, &["drafted"]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.numeric_columns(), vec!["pts"]);
        assert_eq!(schema.categorical_columns(), vec!["conf"]);
        assert_eq!(schema.kind_of("drafted"), None);
    }

    #[test]
    fn test_validate_missing_column() {
        let schema = Schema::new(vec![("pts".to_string(), ColumnKind::Numeric)]);
        let table = Table::new(vec![Column::numeric("ast", vec![Some(1.0)])]).unwrap();
        assert!(matches!(schema.validate(&table), Err(DraftError::Schema { .. })));
    }
}
