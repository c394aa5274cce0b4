//! Unfitted cleaning stages: column dropping, sentinel filling, row filtering

use super::{ImputeStrategy, Imputer};
use crate::error::{DraftError, Result};
use crate::table::Table;
use tracing::warn;

/// Remove the named columns.
///
/// In strict mode a column that is not present is a schema error; otherwise
/// it is skipped with a warning.
pub fn drop_columns(table: &Table, columns: &[String], strict: bool) -> Result<Table> {
    let mut present: Vec<&str> = Vec::with_capacity(columns.len());
    for name in columns {
        if table.contains(name) {
            present.push(name);
        } else if strict {
            return Err(DraftError::schema(name, "cannot be dropped, it is not in the dataset"));
        } else {
            warn!(column = %name, "Column to drop not present, skipping");
        }
    }
    Ok(table.without(&present))
}

/// Replace missing values in the named count-like columns with zero.
///
/// Columns absent from the table are ignored, since the same list is applied
/// to datasets that do not share every column.
pub fn fill_sentinels(table: &Table, columns: &[String]) -> Result<Table> {
    let present: Vec<&str> = columns
        .iter()
        .map(|s| s.as_str())
        .filter(|name| table.contains(name))
        .collect();
    if present.is_empty() {
        return Ok(table.clone());
    }
    Imputer::new(ImputeStrategy::Constant(0.0)).fit_transform(table, &present)
}

/// Keep only rows without a missing value in any column
pub fn drop_incomplete_rows(table: &Table) -> Table {
    let keep: Vec<bool> = (0..table.n_rows())
        .map(|row| table.columns().iter().all(|c| !c.data().is_missing(row)))
        .collect();
    table.filter(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn players() -> Table {
        Table::new(vec![
            Column::text("player", vec![Some("A"), Some("B"), Some("C"), Some("D")]),
            Column::numeric("pick", vec![Some(1.0), None, Some(30.0), None]),
            Column::numeric("Rec_Rank", vec![Some(90.0), Some(80.0), None, None]),
            Column::numeric("rimmade", vec![None, Some(3.0), None, Some(1.0)]),
            Column::numeric("pts", vec![Some(12.0), Some(8.0), None, Some(4.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_columns() {
        let table = players();
        let cols = vec!["pick".to_string(), "Rec_Rank".to_string()];
        let dropped = drop_columns(&table, &cols, true).unwrap();

        assert_eq!(dropped.column_names(), vec!["player", "rimmade", "pts"]);
        assert_eq!(dropped.n_rows(), table.n_rows());
        assert_eq!(dropped.column("pts"), table.column("pts"));
    }

    #[test]
    fn test_drop_missing_column_strict_and_lenient() {
        let table = players();
        let cols = vec!["pick".to_string(), "not_there".to_string()];
        assert!(matches!(
            drop_columns(&table, &cols, true),
            Err(DraftError::Schema { .. })
        ));
        let lenient = drop_columns(&table, &cols, false).unwrap();
        assert!(!lenient.contains("pick"));
        assert_eq!(lenient.n_cols(), 4);
    }

    #[test]
    fn test_fill_sentinels_ignores_absent_columns() {
        let table = players();
        let cols = vec!["rimmade".to_string(), "dunksmade".to_string()];
        let filled = fill_sentinels(&table, &cols).unwrap();

        let rim = filled.column("rimmade").unwrap().as_numeric().unwrap();
        assert_eq!(rim, &[Some(0.0), Some(3.0), Some(0.0), Some(1.0)]);
        assert!(!filled.contains("dunksmade"));
        assert_eq!(filled.column("pts"), table.column("pts"));
    }

    #[test]
    fn test_row_filter_after_sentinels() {
        let table = players();
        let cleaned = drop_columns(&table, &["pick".to_string(), "Rec_Rank".to_string()], true)
            .and_then(|t| fill_sentinels(&t, &["rimmade".to_string()]))
            .map(|t| drop_incomplete_rows(&t))
            .unwrap();

        // only row C has a real gap (pts); rimmade gaps were filled first
        assert_eq!(cleaned.n_rows(), 3);
        assert_eq!(cleaned.null_count(), 0);
    }
}
