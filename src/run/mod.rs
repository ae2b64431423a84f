// src/run/mod.rs
use chrono::Local;
use std::{fs, path::PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::{
    analyze::{analyze, Report},
    consolidate::{absolute, file_identifier, simplify, Policy, Schema},
    error::PrepError,
    export::{append_csv, write_csv},
    load::load_workbook,
    normalize::normalize,
};

const INPUT_EXT: &str = ".xlsx";

/// One run's settings, resolved once from the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub inpath: PathBuf,
    pub outpath: PathBuf,
    pub analyze_only: bool,
    pub consolidate: bool,
    pub keep_types: bool,
    pub policy: Policy,
}

/// Per-run counters, accumulated by the driver and read once for the
/// summary. `converted` counts only files actually written out; files
/// skipped for schema or load problems do not count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub files_in_dir: u64,
    pub processed: u64,
    pub converted: u64,
    pub total_rows: u64,
}

/// Walk `inpath` and push every matching workbook through the pipeline:
/// load, analyze, then (unless analyze-only) normalize and either
/// consolidate or export per file. Strictly sequential; per-file failures
/// are logged with the absolute path and skipped, only configuration and
/// output-side I/O errors abort the run.
pub fn run(config: &Config) -> Result<RunStats, PrepError> {
    if !config.inpath.exists() {
        return Err(PrepError::Config(format!(
            "input path does not exist: {}",
            config.inpath.display()
        )));
    }
    if !config.outpath.exists() {
        return Err(PrepError::Config(format!(
            "output path does not exist: {}",
            config.outpath.display()
        )));
    }

    let mut stats = RunStats::default();
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let report = Report::new(config.outpath.join(format!("{stamp}-namesanalyze.txt")));
    let consolidated = config.outpath.join(format!("{stamp}-far_all.csv"));
    let schema = Schema::far();

    for entry in WalkDir::new(&config.inpath) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("cannot read directory entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        stats.files_in_dir += 1;

        if !entry.file_name().to_string_lossy().ends_with(INPUT_EXT) {
            continue;
        }
        let infile = entry.path();
        info!(file = %infile.display(), "processing");

        // First qualifying file starts the report.
        fs::create_dir_all(&config.outpath)?;
        report.ensure_header(&config.inpath)?;

        let table = match load_workbook(infile, config.keep_types) {
            Ok(t) => t,
            Err(err) => {
                error!(file = %absolute(infile).display(), "skipping: {err}");
                continue;
            }
        };
        stats.processed += 1;

        let (block, rows) = analyze(&table, &infile.to_string_lossy());
        stats.total_rows += rows as u64;
        report.append(&block)?;
        println!("{block}");

        if config.analyze_only {
            continue;
        }

        let table = match normalize(table) {
            Ok(t) => t,
            Err(err) => {
                error!(file = %absolute(infile).display(), "skipping: {err}");
                continue;
            }
        };

        if config.consolidate {
            match simplify(&table, &schema, infile, config.policy) {
                Ok(projected) => {
                    append_csv(&projected, &consolidated)?;
                    info!(
                        file = %absolute(infile).display(),
                        out = %consolidated.display(),
                        "added to consolidated csv"
                    );
                    stats.converted += 1;
                }
                Err(err) if err.is_per_file() => {
                    warn!("skipping for consolidation: {err}");
                }
                Err(err) => return Err(err),
            }
        } else {
            let outfile = config
                .outpath
                .join(format!("{}.csv", file_identifier(infile)));
            write_csv(&table, &outfile)?;
            info!(file = %outfile.display(), "wrote filtered csv");
            stats.converted += 1;
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(inpath: PathBuf, outpath: PathBuf) -> Config {
        Config {
            inpath,
            outpath,
            analyze_only: false,
            consolidate: false,
            keep_types: false,
            policy: Policy::Permissive,
        }
    }

    #[test]
    fn missing_inpath_is_fatal() {
        let out = tempdir().unwrap();
        let cfg = config(PathBuf::from("/no/such/dir"), out.path().to_path_buf());
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, PrepError::Config(_)));
    }

    #[test]
    fn missing_outpath_is_fatal() {
        let input = tempdir().unwrap();
        let cfg = config(input.path().to_path_buf(), PathBuf::from("/no/such/dir"));
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, PrepError::Config(_)));
    }

    #[test]
    fn empty_directory_yields_zero_stats_and_no_artifacts() {
        let input = tempdir().unwrap();
        let out = tempdir().unwrap();
        let cfg = config(input.path().to_path_buf(), out.path().to_path_buf());

        let stats = run(&cfg).unwrap();
        assert_eq!(stats, RunStats::default());
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn non_spreadsheet_files_only_count_in_dir_total() {
        let input = tempdir().unwrap();
        let out = tempdir().unwrap();
        std::fs::write(input.path().join("notes.txt"), "x").unwrap();
        std::fs::write(input.path().join("data.csv"), "a,b").unwrap();

        let cfg = config(input.path().to_path_buf(), out.path().to_path_buf());
        let stats = run(&cfg).unwrap();
        assert_eq!(stats.files_in_dir, 2);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.converted, 0);
    }

    #[test]
    fn unreadable_workbook_is_skipped_not_fatal() {
        let input = tempdir().unwrap();
        let out = tempdir().unwrap();
        std::fs::write(input.path().join("broken.xlsx"), b"not a zip").unwrap();

        let cfg = config(input.path().to_path_buf(), out.path().to_path_buf());
        let stats = run(&cfg).unwrap();
        assert_eq!(stats.files_in_dir, 1);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.converted, 0);
    }
}
