// src/consolidate/mod.rs
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{
    error::{PrepError, SchemaError},
    table::{Cell, Table},
};

/// The fixed FAR field set every consolidated row is restricted to, in
/// output order. Names are post-normalization.
pub const FAR_COLUMNS: [&str; 22] = [
    "original_order",
    "far_line_id",
    "family_number",
    "last_name_corrected",
    "first_name_corrected",
    "other_names",
    "date_of_birth",
    "year_of_birth",
    "sex",
    "citizenship",
    "alien_registration_no.",
    "type_of_original_entry",
    "pre-evacuation_address",
    "pre-evacuation_state",
    "date_of_original_entry",
    "type_of_final_departure",
    "date_of_final_departure",
    "final_departure_state",
    "camp_address_original",
    "camp_address_block",
    "camp_address_barracks",
    "camp_address_room",
];

/// Ordered required-column list enforced during consolidation. Immutable
/// for the life of a run.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Schema { columns }
    }

    /// The full FAR roster schema.
    pub fn far() -> Self {
        Schema::new(FAR_COLUMNS.iter().map(|c| c.to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// How to treat a file whose columns do not cover the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Back-fill missing columns with empty values and keep the file.
    Permissive,
    /// Reject the file outright, naming the missing columns.
    Strict,
}

/// Project a normalized table onto the schema and tag every row with the
/// source file's identifier (base name, extension stripped).
///
/// Permissive never rejects: absent schema columns are filled with empty
/// values, one warning per column, and the identifier leads each row.
/// Strict returns a `SchemaError` listing exactly the missing columns and
/// emits nothing; on success the identifier trails each row.
pub fn simplify(
    table: &Table,
    schema: &Schema,
    source: &Path,
    policy: Policy,
) -> Result<Table, PrepError> {
    let missing: Vec<String> = schema
        .columns()
        .iter()
        .filter(|c| !table.has_column(c))
        .cloned()
        .collect();

    match policy {
        Policy::Strict if !missing.is_empty() => Err(SchemaError::MissingColumns {
            path: absolute(source),
            columns: missing,
        }
        .into()),
        Policy::Permissive => {
            for column in &missing {
                warn!(
                    column = %column,
                    file = %absolute(source).display(),
                    "column not found; consolidating with empty values"
                );
            }
            project(table, schema, source, FarPosition::Leading)
        }
        Policy::Strict => project(table, schema, source, FarPosition::Trailing),
    }
}

#[derive(Clone, Copy)]
enum FarPosition {
    Leading,
    Trailing,
}

fn project(
    table: &Table,
    schema: &Schema,
    source: &Path,
    far_at: FarPosition,
) -> Result<Table, PrepError> {
    let far = file_identifier(source);

    // Index into the source table per schema column; None back-fills Empty.
    let picks: Vec<Option<usize>> = schema
        .columns()
        .iter()
        .map(|c| table.column_index(c))
        .collect();

    let mut columns = Vec::with_capacity(schema.len() + 1);
    if matches!(far_at, FarPosition::Leading) {
        columns.push("far".to_string());
    }
    columns.extend(schema.columns().iter().cloned());
    if matches!(far_at, FarPosition::Trailing) {
        columns.push("far".to_string());
    }

    let rows: Vec<Vec<Cell>> = table
        .rows()
        .iter()
        .map(|row| {
            let mut out = Vec::with_capacity(columns.len());
            if matches!(far_at, FarPosition::Leading) {
                out.push(Cell::Text(far.clone()));
            }
            out.extend(picks.iter().map(|pick| match pick {
                Some(i) => row[*i].clone(),
                None => Cell::Empty,
            }));
            if matches!(far_at, FarPosition::Trailing) {
                out.push(Cell::Text(far.clone()));
            }
            out
        })
        .collect();

    Table::new(columns, rows)
}

/// Source file identifier: base name with the extension stripped.
pub fn file_identifier(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Absolute form of a path for operator-facing messages; falls back to the
/// path as given when it cannot be resolved.
pub fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn schema() -> Schema {
        Schema::new(vec![
            "far_line_id".into(),
            "family_number".into(),
            "date_of_birth".into(),
        ])
    }

    fn table(columns: &[&str], row: &[&str]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![row.iter().map(|v| text(v)).collect()],
        )
        .unwrap()
    }

    #[test]
    fn permissive_always_has_schema_width_plus_far() {
        let t = table(&["family_number", "extra"], &["12-3", "x"]);
        let out = simplify(&t, &schema(), Path::new("/in/A.xlsx"), Policy::Permissive).unwrap();

        assert_eq!(
            out.columns(),
            ["far", "far_line_id", "family_number", "date_of_birth"]
        );
        assert_eq!(
            out.rows()[0],
            vec![text("A"), Cell::Empty, text("12-3"), Cell::Empty]
        );
    }

    #[test]
    fn permissive_drops_extras_and_reorders() {
        let t = table(
            &["date_of_birth", "junk", "family_number", "far_line_id"],
            &["1931-02-01", "x", "12-3", "7"],
        );
        let out = simplify(&t, &schema(), Path::new("B.xlsx"), Policy::Permissive).unwrap();
        assert_eq!(
            out.rows()[0],
            vec![text("B"), text("7"), text("12-3"), text("1931-02-01")]
        );
    }

    #[test]
    fn strict_rejects_naming_exactly_the_missing() {
        let t = table(&["family_number"], &["12-3"]);
        let err = simplify(&t, &schema(), Path::new("/in/A.xlsx"), Policy::Strict).unwrap_err();
        match err {
            PrepError::Schema(SchemaError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, ["far_line_id", "date_of_birth"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_success_puts_far_last() {
        let t = table(
            &["far_line_id", "family_number", "date_of_birth", "extra"],
            &["7", "12-3", "1931-02-01", "x"],
        );
        let out = simplify(&t, &schema(), Path::new("C.xlsx"), Policy::Strict).unwrap();
        assert_eq!(
            out.columns(),
            ["far_line_id", "family_number", "date_of_birth", "far"]
        );
        assert_eq!(
            out.rows()[0],
            vec![text("7"), text("12-3"), text("1931-02-01"), text("C")]
        );
    }

    #[test]
    fn far_schema_is_the_full_roster() {
        let far = Schema::far();
        assert_eq!(far.len(), 22);
        assert_eq!(far.columns()[0], "original_order");
        assert_eq!(far.columns()[21], "camp_address_room");
    }

    #[test]
    fn identifier_strips_extension_only() {
        assert_eq!(file_identifier(Path::new("/a/b/FAR-1944.xlsx")), "FAR-1944");
        assert_eq!(file_identifier(Path::new("no_ext")), "no_ext");
    }
}
