// src/export/mod.rs
use std::{fs::OpenOptions, path::Path};

use crate::{error::PrepError, table::Table};

/// Write a standalone CSV export: header plus every row, replacing any
/// existing file.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), PrepError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.as_text()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Append rows to the consolidated artifact. The header is written only on
/// the call that creates the file; the handle is opened and closed per
/// call so a crash leaves a parseable prefix.
pub fn append_csv(table: &Table, path: &Path) -> Result<(), PrepError> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);
    if write_header {
        writer.write_record(table.columns())?;
    }
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.as_text()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use tempfile::tempdir;

    fn one_row(value: &str) -> Table {
        Table::new(
            vec!["far".into(), "family_number".into()],
            vec![vec![
                Cell::Text(value.to_string()),
                Cell::Text("12-3".to_string()),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn header_written_exactly_once_across_appends() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("far_all.csv");

        append_csv(&one_row("A"), &path)?;
        append_csv(&one_row("B"), &path)?;

        let text = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["far,family_number", "A,12-3", "B,12-3"]);
        Ok(())
    }

    #[test]
    fn values_needing_quotes_survive() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["other_names".into()],
            vec![vec![Cell::Text("Sato, Aiko".into())], vec![Cell::Empty]],
        )?;
        write_csv(&table, &path)?;

        let mut reader = csv::Reader::from_path(&path)?;
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>()?;
        assert_eq!(records[0].get(0), Some("Sato, Aiko"));
        assert_eq!(records[1].get(0), Some(""));
        Ok(())
    }
}
