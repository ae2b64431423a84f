// src/load/mod.rs
use calamine::{open_workbook_auto, Data, Reader};
use std::{collections::HashSet, path::Path};
use tracing::debug;

use crate::{
    error::PrepError,
    table::{Cell, Table},
};

/// Load the first worksheet of an xlsx workbook into a `Table`. The first
/// row is the header; every header cell is read as text.
///
/// Default import forces every value to text and treats blank cells and
/// literal `nan` text as missing. With `keep_types` set, cells keep the
/// type the workbook stored (number / date / text).
pub fn load_workbook(path: &Path, keep_types: bool) -> Result<Table, PrepError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| PrepError::load(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PrepError::load(path, "workbook has no worksheets"))?
        .map_err(|e| PrepError::load(path, e))?;

    let mut rows_iter = range.rows();

    // Header row. An empty sheet yields an empty table.
    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header.iter().map(data_to_text).collect(),
        None => {
            debug!(file = %path.display(), "worksheet is empty");
            return Table::new(Vec::new(), Vec::new());
        }
    };

    // The Table invariant needs unique column names; a workbook that
    // repeats a header is refused at the boundary.
    let mut seen = HashSet::new();
    for name in &columns {
        if !seen.insert(name.as_str()) {
            return Err(PrepError::load(
                path,
                format!("duplicate column name in header: `{}`", name),
            ));
        }
    }

    let rows: Vec<Vec<Cell>> = rows_iter
        .map(|row| row.iter().map(|d| import_cell(d, keep_types)).collect())
        .collect();

    debug!(
        file = %path.display(),
        rows = rows.len(),
        cols = columns.len(),
        keep_types,
        "loaded workbook"
    );
    Table::new(columns, rows)
}

fn import_cell(data: &Data, keep_types: bool) -> Cell {
    if keep_types {
        return match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) if s.is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(d) => Cell::Date(d),
                None => Cell::Text(data_to_text(data)),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        };
    }

    // Text import: stringify everything, then map blank and the literal
    // `nan` the legacy exports used for missing values to Empty.
    let text = data_to_text(data);
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        Cell::Empty
    } else {
        Cell::Text(text)
    }
}

fn data_to_text(data: &Data) -> String {
    match data {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
