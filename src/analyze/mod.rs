// src/analyze/mod.rs
use chrono::Local;
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{error::PrepError, table::Table};

const RULE: &str = "--------------------------\n";

/// Format the structural summary block for one file and return it together
/// with the row count for run-level aggregation. Pure formatting; must run
/// before any destructive transform so the block reflects the file as
/// shipped.
pub fn analyze(table: &Table, label: &str) -> (String, usize) {
    let mut block = String::from(RULE);
    block.push_str(&format!("Filename: {}\n", label));
    block.push_str(&format!(
        "{} rows. {} columns.\n",
        table.n_rows(),
        table.n_cols()
    ));
    block.push_str(&format!("{:?}\n", table.columns()));
    block.push_str(RULE);
    (block, table.n_rows())
}

/// Append-only analysis report. Opened, written and closed per append so a
/// crash mid-run leaves a valid truncated artifact.
pub struct Report {
    path: PathBuf,
}

impl Report {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Report { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the run header line, once. Returns true if this call created
    /// the report.
    pub fn ensure_header(&self, inpath: &Path) -> Result<bool, PrepError> {
        if self.path.is_file() {
            return Ok(false);
        }
        let mut file = std::fs::File::create(&self.path)?;
        writeln!(
            file,
            "farprep analyze run at {} on path: {}",
            Local::now().format("%c"),
            inpath.display()
        )?;
        Ok(true)
    }

    pub fn append(&self, block: &str) -> Result<(), PrepError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(block.as_bytes())?;
        Ok(())
    }
}
