//! Shared helpers for reading DuckDB rows into [`Cell`]s.

use crate::statement::{Cell, Row};

/// Read a column value, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// i64 -> String -> f64 -> bool -> null.
pub(crate) fn get_cell(row: &::duckdb::Row<'_>, idx: usize) -> Cell {
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return Cell::Int(n);
    }
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return Cell::Text(s);
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return Cell::Float(f);
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return Cell::Bool(b);
    }
    Cell::Null
}

/// Convert every column of a DuckDB row.
pub(crate) fn to_row(row: &::duckdb::Row<'_>) -> Row {
    let col_count = row.as_ref().column_count();
    Row::new((0..col_count).map(|i| get_cell(row, i)).collect())
}
