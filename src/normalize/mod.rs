// src/normalize/mod.rs
use std::collections::HashMap;

use crate::{
    error::{PrepError, SchemaError},
    table::{Cell, Table},
};

/// Canonical form of a column name: trim, strip parentheses, spaces to
/// underscores, lowercase. ` Date (of Birth) ` becomes `date_of_birth`.
pub fn canonicalize_name(name: &str) -> String {
    name.trim()
        .replace(['(', ')'], "")
        .replace(' ', "_")
        .to_lowercase()
}

/// Apply the cleaning transforms: drop rows whose every cell is empty,
/// then canonicalize column names. Row order and column order are
/// preserved; idempotent.
///
/// Two source names that canonicalize to the same string make the file
/// ambiguous; that is a `SchemaError`, never a silent overwrite.
pub fn normalize(table: Table) -> Result<Table, PrepError> {
    let (columns, rows) = table.into_parts();

    let rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    let mut by_canonical: HashMap<String, String> = HashMap::with_capacity(columns.len());
    let mut renamed = Vec::with_capacity(columns.len());
    for name in columns {
        let canonical = canonicalize_name(&name);
        if let Some(first) = by_canonical.insert(canonical.clone(), name.clone()) {
            return Err(SchemaError::NameCollision {
                first,
                second: name,
                normalized: canonical,
            }
            .into());
        }
        renamed.push(canonical);
    }

    Table::new(renamed, rows)
}
